use serde::Serialize;

use crate::config::{KeywordTable, Role};

/// Physical column index per logical role, as found in one header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub order_number: Option<usize>,
    pub amount: Option<usize>,
    pub date: Option<usize>,
}

impl ColumnMapping {
    pub fn get(&self, role: Role) -> Option<usize> {
        match role {
            Role::OrderNumber => self.order_number,
            Role::Amount => self.amount,
            Role::Date => self.date,
        }
    }

    fn slot(&mut self, role: Role) -> &mut Option<usize> {
        match role {
            Role::OrderNumber => &mut self.order_number,
            Role::Amount => &mut self.amount,
            Role::Date => &mut self.date,
        }
    }
}

/// Map each role to the first header cell whose lower-cased, trimmed text
/// contains one of the role's keywords.
///
/// Roles are resolved independently: first hit wins, later candidates are
/// never considered, and one column can end up serving several roles
/// (e.g. a header literally named "Datum Betrag").
pub fn detect_columns(header: &[String], keywords: &KeywordTable) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for (col, text) in header.iter().enumerate() {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            continue;
        }
        for role in Role::ALL {
            let slot = mapping.slot(role);
            if slot.is_some() {
                continue;
            }
            if keywords.for_role(role).iter().any(|kw| text.contains(kw.as_str())) {
                *slot = Some(col);
            }
        }
    }

    log::debug!(
        "detected columns: order_number={:?} amount={:?} date={:?}",
        mapping.order_number,
        mapping.amount,
        mapping.date
    );
    mapping
}
