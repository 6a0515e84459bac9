//! Optional-filter WHERE clauses
//!
//! List queries take a handful of optional constraints; unset ones are left
//! out of the statement entirely.

use rusqlite::ToSql;

#[derive(Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = ?` when a value is given
    pub fn eq<V: ToSql + 'static>(&mut self, column: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.params.push(Box::new(value));
            self.conditions
                .push(format!("{} = ?{}", column, self.params.len()));
        }
        self
    }

    /// Case-insensitive equality on a text column
    pub fn eq_nocase(&mut self, column: &str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.params.push(Box::new(value));
            self.conditions
                .push(format!("{} = ?{} COLLATE NOCASE", column, self.params.len()));
        }
        self
    }

    /// Render ` WHERE ...` (empty when nothing constrains)
    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_filters_are_skipped() {
        let mut clause = WhereClause::new();
        clause
            .eq("status", Some("ACTIVE".to_string()))
            .eq::<String>("kind", None)
            .eq_nocase("city", Some("paris".to_string()));
        assert_eq!(clause.sql(), " WHERE status = ?1 AND city = ?2 COLLATE NOCASE");
        assert_eq!(clause.params().len(), 2);

        assert_eq!(WhereClause::new().sql(), "");
    }
}
