use serde::{Deserialize, Serialize};

/// The five Simples Nacional rate tables. Selected per CNAE, never computed
/// (except for the III/V pair, which the Fator R classifier resolves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anexo {
    I,
    II,
    III,
    IV,
    V,
}

impl Anexo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
            Self::V => "V",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "I" => Some(Self::I),
            "II" => Some(Self::II),
            "III" => Some(Self::III),
            "IV" => Some(Self::IV),
            "V" => Some(Self::V),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_every_variant() {
        for anexo in [Anexo::I, Anexo::II, Anexo::III, Anexo::IV, Anexo::V] {
            assert_eq!(Anexo::parse(anexo.as_str()), Some(anexo));
        }
    }

    #[test]
    fn parse_rejects_unknown_strings() {
        assert_eq!(Anexo::parse("VI"), None);
        assert_eq!(Anexo::parse("i"), None);
        assert_eq!(Anexo::parse(""), None);
    }
}
