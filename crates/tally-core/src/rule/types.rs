//! Rule and transaction type definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type RuleId = i64;
pub type AccountId = i64;
pub type CategoryId = i64;
pub type EntityId = i64;

/// Comparison mode of a single matcher.
///
/// Stored rules carry operators as strings. Anything that does not parse to a
/// known operator becomes [`Operator::Ignore`], so one malformed rule cannot
/// poison the evaluation of the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    #[default]
    Ignore,
    Equals,
    NotEquals,
    Contains,
    NotContains,
}

impl Operator {
    /// Parse an operator name, case-insensitively.
    ///
    /// Accepts the canonical names (`EQUALS`, `NOT_EQUALS`, ...) and the short
    /// codes used by older rule exports (`EQ`, `NEQ`, `NOTCONTAINS`, `IG`).
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "EQUALS" | "EQ" => Self::Equals,
            "NOT_EQUALS" | "NOTEQUALS" | "NEQ" => Self::NotEquals,
            "CONTAINS" => Self::Contains,
            "NOT_CONTAINS" | "NOTCONTAINS" => Self::NotContains,
            _ => Self::Ignore,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE",
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::Contains => "CONTAINS",
            Self::NotContains => "NOT_CONTAINS",
        }
    }

    /// Whether this operator selects by exclusion
    pub fn is_negated(&self) -> bool {
        matches!(self, Self::NotEquals | Self::NotContains)
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    /// Single-letter code used when the type takes part in matching
    pub fn code(&self) -> &'static str {
        match self {
            Self::Income => "I",
            Self::Expense => "E",
            Self::Transfer => "T",
        }
    }

    /// Parse either the code (`E`) or the full name (`expense`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "I" | "INCOME" => Some(Self::Income),
            "E" | "EXPENSE" => Some(Self::Expense),
            "T" | "TRANSFER" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("unknown transaction type: {s}"))
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.code().to_string()
    }
}

/// A rule comparison value, or a transaction attribute, decided once at the
/// boundary as either text or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    Text(String),
    Number(Decimal),
}

impl AttrValue {
    pub fn as_attr(&self) -> AttrRef<'_> {
        match self {
            Self::Text(s) => AttrRef::Text(s),
            Self::Number(n) => AttrRef::Number(*n),
        }
    }
}

/// Borrowed view of a transaction attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrRef<'a> {
    Text(&'a str),
    Number(Decimal),
}

/// The five attributes a rule can match on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Description,
    Amount,
    Type,
    AccountTo,
    AccountFrom,
}

impl Attribute {
    /// Order in which a rule's matchers are evaluated
    pub const EVALUATION_ORDER: [Attribute; 5] = [
        Attribute::Description,
        Attribute::Amount,
        Attribute::Type,
        Attribute::AccountTo,
        Attribute::AccountFrom,
    ];
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Description => write!(f, "description"),
            Self::Amount => write!(f, "amount"),
            Self::Type => write!(f, "type"),
            Self::AccountTo => write!(f, "account_to"),
            Self::AccountFrom => write!(f, "account_from"),
        }
    }
}

/// One attribute-level comparison within a rule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Matcher {
    #[serde(default)]
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AttrValue>,
}

impl Matcher {
    pub fn new(operator: Operator, value: Option<AttrValue>) -> Self {
        Self { operator, value }
    }

    pub fn ignore() -> Self {
        Self::default()
    }

    pub fn text(operator: Operator, value: impl Into<String>) -> Self {
        Self::new(operator, Some(AttrValue::Text(value.into())))
    }

    pub fn number(operator: Operator, value: Decimal) -> Self {
        Self::new(operator, Some(AttrValue::Number(value)))
    }

    pub fn account(operator: Operator, account_id: AccountId) -> Self {
        Self::number(operator, Decimal::from(account_id))
    }

    pub fn transaction_type(operator: Operator, ty: TransactionType) -> Self {
        Self::text(operator, ty.code())
    }

    /// True when this matcher can never take part in matching
    pub fn is_ignored(&self) -> bool {
        self.operator == Operator::Ignore || self.value.is_none()
    }
}

/// What a rule assigns to a transaction it wins for. Absent fields leave the
/// transaction's existing values alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assignments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_from_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_to_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_essential: Option<bool>,
}

/// A user-owned classification template.
///
/// Read-only from the engine's perspective: evaluation never mutates a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub user_id: UserId,
    #[serde(default)]
    pub description: Matcher,
    #[serde(default)]
    pub amount: Matcher,
    #[serde(default)]
    pub transaction_type: Matcher,
    #[serde(default)]
    pub account_from: Matcher,
    #[serde(default)]
    pub account_to: Matcher,
    #[serde(default)]
    pub assign: Assignments,
}

impl Rule {
    pub fn builder(id: RuleId, user_id: UserId) -> RuleBuilder {
        RuleBuilder::new(id, user_id)
    }

    pub fn matcher(&self, attribute: Attribute) -> &Matcher {
        match attribute {
            Attribute::Description => &self.description,
            Attribute::Amount => &self.amount,
            Attribute::Type => &self.transaction_type,
            Attribute::AccountTo => &self.account_to,
            Attribute::AccountFrom => &self.account_from,
        }
    }
}

/// Builder for creating rules
#[derive(Debug)]
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleBuilder {
    pub fn new(id: RuleId, user_id: UserId) -> Self {
        Self {
            rule: Rule {
                id,
                user_id,
                description: Matcher::ignore(),
                amount: Matcher::ignore(),
                transaction_type: Matcher::ignore(),
                account_from: Matcher::ignore(),
                account_to: Matcher::ignore(),
                assign: Assignments::default(),
            },
        }
    }

    pub fn description(mut self, operator: Operator, value: impl Into<String>) -> Self {
        self.rule.description = Matcher::text(operator, value);
        self
    }

    pub fn amount(mut self, operator: Operator, value: Decimal) -> Self {
        self.rule.amount = Matcher::number(operator, value);
        self
    }

    pub fn transaction_type(mut self, operator: Operator, ty: TransactionType) -> Self {
        self.rule.transaction_type = Matcher::transaction_type(operator, ty);
        self
    }

    pub fn account_from(mut self, operator: Operator, account_id: AccountId) -> Self {
        self.rule.account_from = Matcher::account(operator, account_id);
        self
    }

    pub fn account_to(mut self, operator: Operator, account_id: AccountId) -> Self {
        self.rule.account_to = Matcher::account(operator, account_id);
        self
    }

    /// Set an arbitrary matcher, e.g. one loaded from storage
    pub fn matcher(mut self, attribute: Attribute, matcher: Matcher) -> Self {
        let slot = match attribute {
            Attribute::Description => &mut self.rule.description,
            Attribute::Amount => &mut self.rule.amount,
            Attribute::Type => &mut self.rule.transaction_type,
            Attribute::AccountTo => &mut self.rule.account_to,
            Attribute::AccountFrom => &mut self.rule.account_from,
        };
        *slot = matcher;
        self
    }

    pub fn assign_category(mut self, category_id: CategoryId) -> Self {
        self.rule.assign.category_id = Some(category_id);
        self
    }

    pub fn assign_entity(mut self, entity_id: EntityId) -> Self {
        self.rule.assign.entity_id = Some(entity_id);
        self
    }

    pub fn assign_account_from(mut self, account_id: AccountId) -> Self {
        self.rule.assign.account_from_id = Some(account_id);
        self
    }

    pub fn assign_account_to(mut self, account_id: AccountId) -> Self {
        self.rule.assign.account_to_id = Some(account_id);
        self
    }

    pub fn assign_essential(mut self, is_essential: bool) -> Self {
        self.rule.assign.is_essential = Some(is_essential);
        self
    }

    pub fn build(self) -> Rule {
        self.rule
    }
}

/// The ephemeral input to classify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCandidate {
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub account_from_id: Option<AccountId>,
    #[serde(default)]
    pub account_to_id: Option<AccountId>,
}

impl TransactionCandidate {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            transaction_type,
            account_from_id: None,
            account_to_id: None,
        }
    }

    pub fn with_account_from(mut self, account_id: AccountId) -> Self {
        self.account_from_id = Some(account_id);
        self
    }

    pub fn with_account_to(mut self, account_id: AccountId) -> Self {
        self.account_to_id = Some(account_id);
        self
    }

    /// The value of `attribute`, or `None` when it does not apply to this
    /// transaction (e.g. no source account on an income).
    pub fn attribute(&self, attribute: Attribute) -> Option<AttrRef<'_>> {
        match attribute {
            Attribute::Description => Some(AttrRef::Text(&self.description)),
            Attribute::Amount => Some(AttrRef::Number(self.amount)),
            Attribute::Type => Some(AttrRef::Text(self.transaction_type.code())),
            Attribute::AccountTo => self.account_to_id.map(|id| AttrRef::Number(id.into())),
            Attribute::AccountFrom => self.account_from_id.map(|id| AttrRef::Number(id.into())),
        }
    }
}
