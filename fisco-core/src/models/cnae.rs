use serde::{Deserialize, Serialize};

use super::annex::Anexo;

/// One activity record as returned by the remote CNAE directory service.
///
/// Field names follow the service's wire format (`fatorR` etc.); the record
/// is consumed only to pre-select an annex and the Fator R eligibility flag
/// before a DAS calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnaeEntry {
    /// Activity code, e.g. "6201-5/01".
    pub codigo: String,
    pub descricao: String,
    /// Default annex for the activity before any Fator R reclassification.
    pub anexo: Anexo,
    /// Whether the activity is in the annex III/V pair resolved by Fator R.
    pub fator_r: bool,
}
