//! Bank-specific extraction strategies.
//!
//! Every bank module exposes `matches(&Document) -> bool` and
//! `extract(&Document) -> Result<ParseResult, ExtractionError>`. Extraction
//! escalates per field from an anchor window to a section scan to a
//! document scan, and any stage yielding more than one distinct value fails
//! with `AmbiguousField`.

mod bbva;
mod brubank;
mod cuenta_dni;
mod galicia;
pub mod generic;
mod mercado_pago;
mod nacion;
mod naranja_x;
mod santander;
mod uala;

pub use generic::GenericStrategy;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExtractionError, Field};
use crate::models::receipt::{Extraction, FieldDecision, ParseResult};

use super::layout::Document;

/// Number of leading non-empty lines searched for the bank's brand.
///
/// The brand is only trusted in the header: receipt bodies name the
/// destination bank, which may be any other bank.
pub(crate) const HEADER_LINES: usize = 3;

/// Banks with a dedicated extraction strategy, in registry priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bank {
    MercadoPago,
    Galicia,
    Santander,
    Bbva,
    Nacion,
    Brubank,
    Uala,
    NaranjaX,
    CuentaDni,
}

impl Bank {
    /// Registry priority order.
    pub const ALL: [Bank; 9] = [
        Bank::MercadoPago,
        Bank::Galicia,
        Bank::Santander,
        Bank::Bbva,
        Bank::Nacion,
        Bank::Brubank,
        Bank::Uala,
        Bank::NaranjaX,
        Bank::CuentaDni,
    ];

    /// Stable identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Bank::MercadoPago => "mercado_pago",
            Bank::Galicia => "galicia",
            Bank::Santander => "santander",
            Bank::Bbva => "bbva",
            Bank::Nacion => "nacion",
            Bank::Brubank => "brubank",
            Bank::Uala => "uala",
            Bank::NaranjaX => "naranja_x",
            Bank::CuentaDni => "cuenta_dni",
        }
    }

    /// Human-readable bank name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Bank::MercadoPago => "Mercado Pago",
            Bank::Galicia => "Banco Galicia",
            Bank::Santander => "Santander",
            Bank::Bbva => "BBVA",
            Bank::Nacion => "Banco Nación",
            Bank::Brubank => "Brubank",
            Bank::Uala => "Ualá",
            Bank::NaranjaX => "Naranja X",
            Bank::CuentaDni => "Cuenta DNI",
        }
    }

    /// Whether the receipt was issued by this bank.
    pub fn matches(&self, text: &str) -> bool {
        let doc = Document::new(text);
        match self {
            Bank::MercadoPago => mercado_pago::matches(&doc),
            Bank::Galicia => galicia::matches(&doc),
            Bank::Santander => santander::matches(&doc),
            Bank::Bbva => bbva::matches(&doc),
            Bank::Nacion => nacion::matches(&doc),
            Bank::Brubank => brubank::matches(&doc),
            Bank::Uala => uala::matches(&doc),
            Bank::NaranjaX => naranja_x::matches(&doc),
            Bank::CuentaDni => cuenta_dni::matches(&doc),
        }
    }

    /// Extract payment facts with this bank's layout rules.
    pub fn extract(&self, text: &str) -> Result<Extraction, ExtractionError> {
        let doc = Document::new(text);
        let result = match self {
            Bank::MercadoPago => mercado_pago::extract(&doc),
            Bank::Galicia => galicia::extract(&doc),
            Bank::Santander => santander::extract(&doc),
            Bank::Bbva => bbva::extract(&doc),
            Bank::Nacion => nacion::extract(&doc),
            Bank::Brubank => brubank::extract(&doc),
            Bank::Uala => uala::extract(&doc),
            Bank::NaranjaX => naranja_x::extract(&doc),
            Bank::CuentaDni => cuenta_dni::extract(&doc),
        }?;

        debug!(
            "{} extracted amount {} date {}",
            self.name(),
            result.amount,
            result.iso_date()
        );

        let mut decisions = vec![
            FieldDecision::unique(Field::Amount),
            FieldDecision::unique(Field::Date),
        ];
        if result.has_destination() {
            decisions.push(FieldDecision::unique(Field::Destination));
        }

        Ok(Extraction::new(self.name(), result, decisions))
    }
}

/// Assemble a bank result, failing on a missing amount or date.
pub(crate) fn finish(
    amount: Option<Decimal>,
    date: Option<NaiveDate>,
    destination_account: Option<String>,
    destination_alias: Option<String>,
) -> Result<ParseResult, ExtractionError> {
    Ok(ParseResult {
        amount: amount.ok_or(ExtractionError::MissingField(Field::Amount))?,
        date: date.ok_or(ExtractionError::MissingField(Field::Date))?,
        destination_account,
        destination_alias,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Receipt texts as they come out of OCR, one per bank.

    pub const MERCADO_PAGO: &str = "Comprobante de transferencia
Mercado Pago
$ 1.234,56
Viernes, 4 de julio de 2025 a las 14:33 hs
De
Juan Pérez
CVU: 0000003100011111111111
Para
Tienda SA
CVU: 0000003100072077739741
Banco: Mercado Pago
Monto transferido
$ 1.234,56
Número de operación de Mercado Pago
98765432101";

    pub const GALICIA: &str = "Galicia
Comprobante de transferencia
Transferiste
$ 1.234,56
Fecha
04/07/2025 - 14:33
Cuenta origen
Caja de ahorro en pesos 4051234-5 123-4
CBU 0070123420000012345678
Destinatario
Tienda SA
CUIT 30-71234567-8
CBU 0000003100072077739741
Banco destino
Mercado Pago
Número de comprobante
000123456";

    pub const SANTANDER: &str = "Santander
Transferencia realizada
Importe
$ 1.234,56
Fecha de ejecución
04/07/2025
Cuenta origen
CBU 0720000788000012345678
Cuenta destino
CBU 0000003100072077739741
Alias destino
tienda.pagos
Titular
Tienda SA
Concepto
Varios
Número de operación
12345678";

    pub const BBVA: &str = "BBVA
Comprobante de transferencia
Importe transferido
$1.234,56
Fecha de operación
04-07-2025 14:33
Desde
Cuenta Corriente en Pesos
CBU 0170123420000012345678
Hacia
Tienda SA
CBU destino: 0000003100072077739741
Alias destino: tienda.pagos
Referencia
VARIOS
Nro. de operación
4455667788";

    pub const NACION: &str = "BNA+
Banco de la Nación Argentina
Constancia de transferencia
Fecha: 04/JUL/2025 14:33
Monto: $ 1.234,56
Cuenta de débito
CBU 0110012340001234567890
Destinatario: TIENDA SA
CBU/CVU: 0000003100072077739741
Alias: TIENDA.PAGOS
Concepto: VAR
Nro. de transacción: 123456789";

    pub const BRUBANK: &str = "brubank
¡Listo! Enviaste dinero
Monto enviado
$ 1.234,56
Fecha
04/07/25 14:33
Para
Tienda SA
CVU 0000003100072077739741
Alias destino
tienda.pagos
Desde
Tu cuenta Brubank
CVU 1430001713000012345678
Código de transacción
AB12CD34";

    pub const UALA: &str = "Ualá
Transferencia enviada
Monto
$ 1.234,56
Fecha y hora
14:3304/07/2025
Destinatario
Tienda SA
CVU 0000003100072077739741
Banco
Mercado Pago
Número de operación
UA-99887766";

    pub const NARANJA_X: &str = "Naranja X
Comprobante de transferencia
Enviaste
$ 1.234,56
4 de julio de 2025, 14:33 h
Origen
Cuenta Naranja X
CVU 0000253300000012345678
Destino
Tienda SA
CBU/CVU
0000003100072077739741
Alias
tienda.pagos
ID de operación
NX-445566";

    pub const CUENTA_DNI: &str = "Cuenta DNI
Banco Provincia
Transferencia exitosa
Importe: $1.234,56
Fecha: 2025-07-04 14:33:10
CBU origen: 0140999803200012345678
CBU destino: 0000003100072077739741
Titular destino: TIENDA SA
Código de operación: 7788990011";

    pub const ALL: [(super::Bank, &str); 9] = [
        (super::Bank::MercadoPago, MERCADO_PAGO),
        (super::Bank::Galicia, GALICIA),
        (super::Bank::Santander, SANTANDER),
        (super::Bank::Bbva, BBVA),
        (super::Bank::Nacion, NACION),
        (super::Bank::Brubank, BRUBANK),
        (super::Bank::Uala, UALA),
        (super::Bank::NaranjaX, NARANJA_X),
        (super::Bank::CuentaDni, CUENTA_DNI),
    ];
}
