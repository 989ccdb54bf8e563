/// Terminal settlement outcome of a sale. Anything else the processor
/// reports is a transient state that must not touch the overall order
/// status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    Settled,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalized {
    Terminal(Settlement),
    NonTerminal,
}

impl Normalized {
    /// The `statusPedidoGeral` value to write, if any.
    pub fn order_status(&self) -> Option<&'static str> {
        match self {
            Self::Terminal(Settlement::Settled) => Some("concluida"),
            Self::Terminal(Settlement::Failed) => Some("falha_pagamento_geral"),
            Self::NonTerminal => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

/// `accredited` is how the processor reports an approved payment on some
/// payment methods; both settle the sale.
pub fn normalize(raw_status: &str) -> Normalized {
    match raw_status {
        "approved" | "accredited" => Normalized::Terminal(Settlement::Settled),
        "rejected" | "cancelled" | "expired" | "charged_back" => {
            Normalized::Terminal(Settlement::Failed)
        }
        _ => Normalized::NonTerminal,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accredited_is_a_synonym_of_approved() {
        assert_eq!(normalize("accredited"), normalize("approved"));
        assert_eq!(
            normalize("approved"),
            Normalized::Terminal(Settlement::Settled)
        );
    }

    #[test]
    fn failure_statuses_settle_as_failed() {
        for status in ["rejected", "cancelled", "expired", "charged_back"] {
            assert_eq!(normalize(status), Normalized::Terminal(Settlement::Failed));
        }
    }

    #[test]
    fn transient_and_unknown_statuses_are_non_terminal() {
        for status in ["pending", "in_process", "unknown", "authorized", ""] {
            assert_eq!(normalize(status), Normalized::NonTerminal);
        }
    }

    #[test]
    fn order_status_values() {
        assert_eq!(
            normalize("approved").order_status(),
            Some("concluida")
        );
        assert_eq!(
            normalize("expired").order_status(),
            Some("falha_pagamento_geral")
        );
        assert_eq!(normalize("pending").order_status(), None);
    }
}
