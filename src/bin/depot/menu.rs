//! Interactive text menu over an [`Inventory`].
//!
//! Reads answers line by line from any [`BufRead`] and writes prompts and
//! results to any [`Write`]. End of input ends the session like option `0`.

use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use depot::{
    Inventory, InventoryError,
    types::{self, Date, Quantity, Stock},
};
use itertools::Itertools;
use tracing::debug;

const MAIN_MENU: [&str; 5] = [
    "1. Recepcion de Mercancia",
    "2. Registrar Pedido de Despacho",
    "3. Cancelacion",
    "4. Reporte de Estado",
    "0. Salir",
];

const CANCEL_MENU: [&str; 2] = [
    "1. Baja de Producto (Eliminar lote del indice)",
    "2. Cancelar Pedido especifico (restablece stock)",
];

/// Answer to a single prompt.
enum Reply<T> {
    Value(T),
    Invalid,
    Closed,
}

/// Whether the session goes on after a menu option.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Unwraps a [`Reply`], reporting invalid input and ending the option early.
macro_rules! answer {
    ($menu:expr, $reply:expr, $invalid:expr) => {
        match $reply {
            Reply::Value(value) => value,
            Reply::Invalid => {
                $menu.say($invalid)?;
                return Ok(Flow::Continue);
            }
            Reply::Closed => return Ok(Flow::Exit),
        }
    };
}

pub struct Menu<R, W> {
    inventory: Inventory,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(inventory: Inventory, input: R, output: W) -> Self {
        Self {
            inventory,
            input,
            output,
        }
    }

    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }

    /// Run the menu loop until option `0` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        self.say("Sistema Logístico - Puerto de Distribución de Alimentos")?;
        self.say("-----------------------------------------------")?;
        loop {
            self.say("\n Menú:")?;
            for line in MAIN_MENU {
                self.say(line)?;
            }
            let option: i64 = match self.ask_number("Seleccione una opcion: ")? {
                Reply::Value(option) => option,
                Reply::Invalid => {
                    self.say("Entrada inválida.")?;
                    continue;
                }
                Reply::Closed => break,
            };
            debug!(option, "menu option selected");
            let flow = match option {
                1 => self.receive()?,
                2 => self.dispatch()?,
                3 => self.cancel()?,
                4 => self.report()?,
                0 => {
                    self.say("Saliendo... liberando memoria.")?;
                    Flow::Exit
                }
                _ => {
                    self.say("Opción inválida.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }
        self.output.flush()
    }

    fn receive(&mut self) -> io::Result<Flow> {
        let reply = self.ask_number::<Date>("Ingrese fecha de vencimiento (AAAAMMDD): ")?;
        let date = answer!(self, reply, "Fecha inválida.");
        if self.inventory.batch(date).is_some() {
            self.say("Error: Ya existe un lote con la misma fecha.")?;
            return Ok(Flow::Continue);
        }
        let reply = self.ask_text("Ingrese nombre del producto: ")?;
        let product = answer!(self, reply, "Producto inválido.");
        let reply = self.ask_number::<Stock>("Ingrese cantidad (stock total): ")?;
        let stock = answer!(self, reply, "Cantidad inválida.");

        match self.inventory.receive_batch(date, stock, &product) {
            Ok(()) => self.say("Lote insertado y árbol balanceado.")?,
            Err(InventoryError::DuplicateKey { .. }) => {
                self.say("No se insertó (fecha duplicada).")?
            }
            Err(err) => self.say(&format!("No se insertó: {err}"))?,
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self) -> io::Result<Flow> {
        let reply = self.ask_text("Ingrese producto a despachar: ")?;
        let product = answer!(self, reply, "Producto inválido.");
        if self.inventory.oldest_batch(&product).is_none() {
            self.say(&format!("No hay lotes disponibles del producto '{product}'."))?;
            return Ok(Flow::Continue);
        }
        let reply = self.ask_text("Ingrese destino: ")?;
        let destination = answer!(self, reply, "Destino inválido.");
        let reply = self.ask_number::<i64>("Ingrese cantidad solicitada: ")?;
        let raw_quantity = answer!(self, reply, "Cantidad inválida.");
        let quantity = match types::quantity(raw_quantity) {
            Ok(quantity) => quantity,
            Err(_) if raw_quantity <= 0 => {
                self.say("Cantidad debe ser positiva.")?;
                return Ok(Flow::Continue);
            }
            Err(_) => {
                self.say("Cantidad inválida.")?;
                return Ok(Flow::Continue);
            }
        };

        match self.inventory.dispatch(&product, &destination, quantity) {
            Ok(receipt) => self.say(&format!(
                "Pedido registrado en lote {}. Stock restante: {}",
                receipt.date, receipt.remaining_stock
            ))?,
            Err(InventoryError::InsufficientStock {
                date,
                product,
                available,
                ..
            }) => self.say(&format!(
                "Stock insuficiente en lote {date} ({product}). Disponible: {available}"
            ))?,
            Err(InventoryError::AllocationFailure { .. }) => {
                self.say("No se pudo registrar el pedido.")?
            }
            Err(err) => self.say(&format!("No se pudo registrar el pedido: {err}"))?,
        }
        Ok(Flow::Continue)
    }

    fn cancel(&mut self) -> io::Result<Flow> {
        self.say("\nCancelación:")?;
        for line in CANCEL_MENU {
            self.say(line)?;
        }
        let reply = self.ask_number::<i64>("Seleccione opción: ")?;
        match answer!(self, reply, "Entrada inválida.") {
            1 => self.remove_batch(),
            2 => self.cancel_order(),
            _ => {
                self.say("Opción de cancelación inválida.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn remove_batch(&mut self) -> io::Result<Flow> {
        let reply = self.ask_number::<Date>("Ingrese fecha del lote a eliminar (AAAAMMDD): ")?;
        let date = answer!(self, reply, "Fecha inválida.");

        match self.inventory.remove_batch(date) {
            Ok(receipt) => {
                self.say("Lote eliminado y árbol balanceado.")?;
                if receipt.dropped_orders > 0 {
                    self.say(&format!(
                        "Se descartaron {} pedidos en espera.",
                        receipt.dropped_orders
                    ))?;
                }
            }
            Err(InventoryError::NotFound { .. }) => {
                self.say("No se encontró la fecha indicada.")?
            }
            Err(InventoryError::PendingOrders { date, pending }) => self.say(&format!(
                "El lote {date} tiene {pending} pedidos en espera; no se eliminó."
            ))?,
            Err(err) => self.say(&format!("No se eliminó el lote: {err}"))?,
        }
        Ok(Flow::Continue)
    }

    fn cancel_order(&mut self) -> io::Result<Flow> {
        let reply = self
            .ask_number::<Date>("Ingrese fecha del lote donde está el pedido (AAAAMMDD): ")?;
        let date = answer!(self, reply, "Fecha inválida.");
        if self.inventory.batch(date).is_none() {
            self.say(&format!("No existe lote con fecha {date}."))?;
            return Ok(Flow::Continue);
        }
        let reply = self.ask_text("Ingrese destino del pedido a cancelar: ")?;
        let destination = answer!(self, reply, "Destino inválido.");
        let reply = self.ask_number::<i64>("Ingrese cantidad del pedido a cancelar: ")?;
        let raw_quantity = answer!(self, reply, "Cantidad inválida.");

        // Quantities no order can hold simply never match.
        let Ok(quantity) = Quantity::try_from(raw_quantity) else {
            self.say(&format!(
                "No se encontró el pedido indicado en la cola del lote {date}."
            ))?;
            return Ok(Flow::Continue);
        };
        match self.inventory.cancel_order(date, &destination, quantity) {
            Ok(receipt) => self.say(&format!(
                "Pedido cancelado. Stock del lote {} ahora: {}",
                receipt.date, receipt.stock
            ))?,
            Err(_) => self.say(&format!(
                "No se encontró el pedido indicado en la cola del lote {date}."
            ))?,
        }
        Ok(Flow::Continue)
    }

    fn report(&mut self) -> io::Result<Flow> {
        let report = self.inventory.report();
        if report.is_empty() {
            self.say("No hay inventario registrado.")?;
        } else {
            self.say("\nEstado del Inventario (de más próximo a vencer a más lejano):")?;
            let lines = report.iter().join("\n");
            self.say(&lines)?;
        }
        Ok(Flow::Continue)
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    fn ask_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask_text(&mut self, prompt: &str) -> io::Result<Reply<String>> {
        Ok(match self.ask_line(prompt)? {
            None => Reply::Closed,
            Some(line) if line.is_empty() => Reply::Invalid,
            Some(line) => Reply::Value(line),
        })
    }

    fn ask_number<T: FromStr>(&mut self, prompt: &str) -> io::Result<Reply<T>> {
        Ok(match self.ask_line(prompt)? {
            None => Reply::Closed,
            Some(line) => match line.trim().parse() {
                Ok(value) => Reply::Value(value),
                Err(_) => Reply::Invalid,
            },
        })
    }
}
