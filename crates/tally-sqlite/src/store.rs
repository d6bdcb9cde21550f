//! SQLite storage backend implementing the classifier's collaborator traits

use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use tally_core::fuzzy::FuzzyCandidate;
use tally_core::rule::{Assignments, Attribute, Matcher, Rule, UserId};
use tally_core::storage::{CandidateSource, RuleSource, StoreResult};
use tracing::{debug, warn};

use crate::columns::{load_matcher, store_value};
use crate::error::{Result, SqliteError};

const RULE_COLUMNS: &str = "id, user_id,
    description_operator, description_value,
    amount_operator, amount_value,
    type_operator, type_value,
    account_from_operator, account_from_value,
    account_to_operator, account_to_value,
    assign_category_id, assign_entity_id, assign_account_from_id, assign_account_to_id,
    assign_is_essential";

/// Matcher column pairs in `RULE_COLUMNS` order, starting at column 2
const MATCHER_COLUMNS: [Attribute; 5] = [
    Attribute::Description,
    Attribute::Amount,
    Attribute::Type,
    Attribute::AccountFrom,
    Attribute::AccountTo,
];

/// Names table for the fuzzy fallback
#[derive(Debug, Clone, Copy)]
enum NameTable {
    Entities,
    Categories,
}

impl NameTable {
    fn table(self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::Categories => "categories",
        }
    }

    fn kind(self) -> &'static str {
        match self {
            Self::Entities => "entity",
            Self::Categories => "category",
        }
    }
}

/// A rules row before its matcher values are typed
struct RuleRow {
    id: i64,
    user_id: UserId,
    matchers: Vec<(String, Value)>,
    assign: Assignments,
}

impl RuleRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut matchers = Vec::with_capacity(MATCHER_COLUMNS.len());
        for i in 0..MATCHER_COLUMNS.len() {
            let column = 2 + i * 2;
            matchers.push((row.get::<_, String>(column)?, row.get::<_, Value>(column + 1)?));
        }
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            matchers,
            assign: Assignments {
                category_id: row.get(12)?,
                entity_id: row.get(13)?,
                account_from_id: row.get(14)?,
                account_to_id: row.get(15)?,
                is_essential: row.get(16)?,
            },
        })
    }

    fn into_rule(self) -> Result<Rule> {
        let mut rule = Rule::builder(self.id, self.user_id).build();
        for (attribute, (operator, value)) in MATCHER_COLUMNS.into_iter().zip(self.matchers) {
            let matcher = load_matcher(self.id, attribute, &operator, value)?;
            *matcher_slot(&mut rule, attribute) = matcher;
        }
        rule.assign = self.assign;
        Ok(rule)
    }
}

fn matcher_slot(rule: &mut Rule, attribute: Attribute) -> &mut Matcher {
    match attribute {
        Attribute::Description => &mut rule.description,
        Attribute::Amount => &mut rule.amount,
        Attribute::Type => &mut rule.transaction_type,
        Attribute::AccountFrom => &mut rule.account_from,
        Attribute::AccountTo => &mut rule.account_to,
    }
}

/// SQLite-backed rule and name store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SQLite store from a connection
    ///
    /// The connection should already have migrations applied.
    /// Use [`crate::migrate::migrate`] to initialize a fresh database.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Create a new in-memory SQLite store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::migrate::migrate(&conn)?;
        Ok(Self::new(conn))
    }

    /// Create a new file-backed SQLite store
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        crate::migrate::migrate(&conn)?;
        Ok(Self::new(conn))
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Store a rule. Fails if a rule with the same id exists.
    pub fn insert_rule(&self, rule: &Rule) -> Result<()> {
        if self.exists("rules", rule.id)? {
            return Err(SqliteError::AlreadyExists {
                kind: "rule",
                id: rule.id,
            });
        }

        let matcher = |attribute: Attribute| {
            let m = rule.matcher(attribute);
            (m.operator.as_str(), m.value.as_ref().map(store_value))
        };
        let (description_op, description_value) = matcher(Attribute::Description);
        let (amount_op, amount_value) = matcher(Attribute::Amount);
        let (type_op, type_value) = matcher(Attribute::Type);
        let (from_op, from_value) = matcher(Attribute::AccountFrom);
        let (to_op, to_value) = matcher(Attribute::AccountTo);

        self.conn.execute(
            &format!(
                "INSERT INTO rules ({RULE_COLUMNS})
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                rule.id,
                rule.user_id,
                description_op,
                description_value,
                amount_op,
                amount_value,
                type_op,
                type_value,
                from_op,
                from_value,
                to_op,
                to_value,
                rule.assign.category_id,
                rule.assign.entity_id,
                rule.assign.account_from_id,
                rule.assign.account_to_id,
                rule.assign.is_essential,
            ],
        )?;

        debug!(rule_id = rule.id, user_id = rule.user_id, "stored rule");
        Ok(())
    }

    /// Store an entity name for the fuzzy fallback
    pub fn insert_entity(&self, user_id: UserId, id: i64, name: &str) -> Result<()> {
        self.insert_name(NameTable::Entities, user_id, id, name)
    }

    /// Store a category name for the fuzzy fallback
    pub fn insert_category(&self, user_id: UserId, id: i64, name: &str) -> Result<()> {
        self.insert_name(NameTable::Categories, user_id, id, name)
    }

    /// All rules owned by a user, ordered by id.
    ///
    /// A rule holding a value that cannot be loaded is skipped with a warning;
    /// the user's other rules still load.
    pub fn load_rules(&self, user_id: UserId) -> Result<Vec<Rule>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RULE_COLUMNS} FROM rules WHERE user_id = ? ORDER BY id"
        ))?;
        let rows = stmt
            .query_map([user_id], RuleRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let rules = rows
            .into_iter()
            .filter_map(|row| {
                let rule_id = row.id;
                match row.into_rule() {
                    Ok(rule) => Some(rule),
                    Err(e) => {
                        warn!(rule_id, user_id, error = %e, "skipping unloadable rule");
                        None
                    }
                }
            })
            .collect();
        Ok(rules)
    }

    fn load_names(&self, table: NameTable, user_id: UserId) -> Result<Vec<FuzzyCandidate>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name FROM {} WHERE user_id = ? ORDER BY id",
            table.table()
        ))?;
        let names = stmt
            .query_map([user_id], |row| {
                Ok(FuzzyCandidate::new(row.get(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    fn insert_name(&self, table: NameTable, user_id: UserId, id: i64, name: &str) -> Result<()> {
        if self.exists(table.table(), id)? {
            return Err(SqliteError::AlreadyExists {
                kind: table.kind(),
                id,
            });
        }
        self.conn.execute(
            &format!(
                "INSERT INTO {} (id, user_id, name) VALUES (?, ?, ?)",
                table.table()
            ),
            params![id, user_id, name],
        )?;
        Ok(())
    }

    fn exists(&self, table: &str, id: i64) -> Result<bool> {
        let exists = self
            .conn
            .prepare(&format!("SELECT 1 FROM {} WHERE id = ?", table))?
            .exists([id])?;
        Ok(exists)
    }
}

impl RuleSource for SqliteStore {
    fn rules_for_user(&self, user_id: UserId) -> StoreResult<Vec<Rule>> {
        Ok(self.load_rules(user_id)?)
    }
}

impl CandidateSource for SqliteStore {
    fn entity_candidates(&self, user_id: UserId) -> StoreResult<Vec<FuzzyCandidate>> {
        Ok(self.load_names(NameTable::Entities, user_id)?)
    }

    fn category_candidates(&self, user_id: UserId) -> StoreResult<Vec<FuzzyCandidate>> {
        Ok(self.load_names(NameTable::Categories, user_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use tally_core::rule::{Operator, TransactionType};

    #[test]
    fn rule_survives_storage() {
        let store = SqliteStore::in_memory().unwrap();
        let rule = Rule::builder(3, 1)
            .description(Operator::Contains, "Netflix")
            .amount(Operator::Equals, Decimal::new(1199, 2))
            .transaction_type(Operator::Equals, TransactionType::Expense)
            .account_from(Operator::NotEquals, 4)
            .assign_category(2)
            .assign_essential(false)
            .build();

        store.insert_rule(&rule).unwrap();

        assert_eq!(store.load_rules(1).unwrap(), vec![rule]);
    }

    #[test]
    fn stored_text_values_are_typed_on_load() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO rules (id, user_id, amount_operator, amount_value,
                                    account_to_operator, account_to_value)
                 VALUES (1, 1, 'EQUALS', '1990', 'EQUALS', '7')",
                [],
            )
            .unwrap();

        let rules = store.load_rules(1).unwrap();
        assert_eq!(
            rules[0].amount,
            Matcher::number(Operator::Equals, Decimal::from(1990))
        );
        assert_eq!(rules[0].account_to, Matcher::account(Operator::Equals, 7));
        assert!(rules[0].description.is_ignored());
    }

    #[test]
    fn unloadable_rule_is_skipped() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .insert_rule(
                &Rule::builder(1, 1)
                    .description(Operator::Contains, "rent")
                    .assign_category(7)
                    .build(),
            )
            .unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO rules (id, user_id, amount_operator, amount_value)
                 VALUES (2, 1, 'EQUALS', x'00')",
                [],
            )
            .unwrap();
        store
            .connection()
            .execute(
                "INSERT INTO rules (id, user_id, amount_operator, amount_value)
                 VALUES (3, 1, 'EQUALS', 1e999)",
                [],
            )
            .unwrap();

        let ids: Vec<i64> = store.rules_for_user(1).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }
}
