//! Domain models for Tally

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Month bucket for records without a parseable date
pub const UNKNOWN_MONTH: &str = "unknown";

/// Type assigned to every row when the export has no `type` column
pub const DEFAULT_TRANSACTION_TYPE: &str = "debit";

/// Spending categories, in keyword-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Grocery,
    Transport,
    Rent,
    Bills,
    Subscription,
    Shopping,
    Health,
    Entertainment,
    Other,
}

impl Category {
    /// Every category, `Other` last
    pub const ALL: [Category; 10] = [
        Self::Food,
        Self::Grocery,
        Self::Transport,
        Self::Rent,
        Self::Bills,
        Self::Subscription,
        Self::Shopping,
        Self::Health,
        Self::Entertainment,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Grocery => "Grocery",
            Self::Transport => "Transport",
            Self::Rent => "Rent",
            Self::Bills => "Bills",
            Self::Subscription => "Subscription",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Entertainment => "Entertainment",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single normalized transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction date (None when the cell was missing or unparseable)
    pub date: Option<NaiveDate>,
    /// Always non-negative
    pub amount: f64,
    /// Lowercased transaction type, matched by substring ("debit"/"credit")
    #[serde(rename = "type")]
    pub tx_type: String,
    pub description: Option<String>,
    pub category: Category,
    /// "YYYY-MM" or "unknown"
    pub month: String,
}

impl TransactionRecord {
    /// Outflow: the type contains "debit"
    pub fn is_debit(&self) -> bool {
        self.tx_type.contains("debit")
    }

    /// Inflow: the type contains "credit"
    pub fn is_credit(&self) -> bool {
        self.tx_type.contains("credit")
    }
}

/// An ordered list of key/value pairs that serializes as a JSON object
/// whose key order is the list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<K, V>(Vec<(K, V)>);

impl<K, V> Ranked<K, V> {
    pub fn new(entries: Vec<(K, V)>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
        self.0.iter()
    }

    /// The first `n` entries (or all of them when there are fewer)
    pub fn top(&self, n: usize) -> &[(K, V)] {
        &self.0[..n.min(self.0.len())]
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn into_inner(self) -> Vec<(K, V)> {
        self.0
    }
}

impl<K: PartialEq, V> Ranked<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<K, V> Default for Ranked<K, V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'a, K, V> IntoIterator for &'a Ranked<K, V> {
    type Item = &'a (K, V);
    type IntoIter = std::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Serialize, V: Serialize> Serialize for Ranked<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Deserialize<'de> for Ranked<K, V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RankedVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Visitor<'de> for RankedVisitor<K, V> {
            type Value = Ranked<K, V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry()? {
                    entries.push((k, v));
                }
                Ok(Ranked(entries))
            }
        }

        deserializer.deserialize_map(RankedVisitor(PhantomData))
    }
}

/// Aggregated view of one transaction export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Month → total debit amount, ascending by month key
    pub monthly_spending: BTreeMap<String, f64>,
    /// Mean of the monthly debit totals (0.0 without debits)
    pub avg_monthly_spending: f64,
    /// Mean of the monthly credit totals; None when there are no credits
    pub estimated_monthly_income: Option<f64>,
    /// Category → total debit amount, descending by amount
    pub category_totals: Ranked<Category, f64>,
    /// Most frequent descriptions with their counts (at most 10)
    pub recurring: Ranked<String, usize>,
    pub raw_rows: Vec<TransactionRecord>,
}

impl AnalysisSummary {
    /// The `n` highest-spending categories
    pub fn top_categories(&self, n: usize) -> &[(Category, f64)] {
        self.category_totals.top(n)
    }

    pub fn transaction_count(&self) -> usize {
        self.raw_rows.len()
    }
}

/// A savings target to check against the current analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRequest {
    #[serde(default)]
    pub goal_amount: f64,
    /// Number of months to reach the goal (must be at least 1)
    #[serde(default = "default_goal_months")]
    pub months: i64,
    /// Overrides the income estimated from credit rows
    #[serde(default)]
    pub monthly_income: Option<f64>,
}

fn default_goal_months() -> i64 {
    1
}

/// Same defaults as deserializing `{}`
impl Default for GoalRequest {
    fn default() -> Self {
        Self::new(0.0, default_goal_months())
    }
}

impl GoalRequest {
    pub fn new(goal_amount: f64, months: i64) -> Self {
        Self {
            goal_amount,
            months,
            monthly_income: None,
        }
    }

    pub fn with_income(mut self, monthly_income: f64) -> Self {
        self.monthly_income = Some(monthly_income);
        self
    }
}

/// Verdict of a goal check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalResult {
    pub feasible: bool,
    pub current_monthly_savings: f64,
    pub needed_monthly_savings: f64,
    /// None when nothing is being saved at the current rate
    pub months_needed_at_current_rate: Option<f64>,
    pub suggestions: Vec<String>,
}
