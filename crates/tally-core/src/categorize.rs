//! Keyword-based transaction categorization
//!
//! Categories are matched by case-insensitive substring search over the
//! description. The table is scanned in its defining order and the first
//! category with any matching keyword wins, so the order is a tie-break rule.

use crate::models::Category;

/// Default keyword table, in match-priority order
pub const DEFAULT_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &["zomato", "swiggy", "restaurant", "cafe", "coffee", "dominos", "mcdonald"],
    ),
    (
        Category::Grocery,
        &["bigbasket", "grocery", "grocer", "supermarket", "dmart"],
    ),
    (
        Category::Transport,
        &["ola", "uber", "taxi", "bus", "metro", "rail", "travel"],
    ),
    (Category::Rent, &["rent", "landlord"]),
    (
        Category::Bills,
        &["electricity", "water", "internet", "airtel", "jio", "bill"],
    ),
    (
        Category::Subscription,
        &["netflix", "prime", "spotify", "hotstar", "zee5"],
    ),
    (
        Category::Shopping,
        &["flipkart", "amazon", "myntra", "store", "shop"],
    ),
    (
        Category::Health,
        &["clinic", "hospital", "pharmacy", "doctor", "medic"],
    ),
    (
        Category::Entertainment,
        &["movie", "cinema", "concert", "event"],
    ),
];

/// Ordered (category, keywords) rules used to classify descriptions
#[derive(Debug, Clone)]
pub struct KeywordTable {
    rules: Vec<(Category, Vec<String>)>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::from_rules(DEFAULT_KEYWORDS.iter().map(|(c, kws)| (*c, kws.iter().copied())))
    }
}

impl KeywordTable {
    /// Build a table from ordered rules. Keywords are lowercased; empty ones are dropped.
    pub fn from_rules<I, K, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (Category, K)>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|(category, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|k| k.as_ref().trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (category, keywords)
            })
            .collect();
        Self { rules }
    }

    /// Categorize a description; absent descriptions are always `Other`
    pub fn categorize(&self, description: Option<&str>) -> Category {
        let Some(desc) = description else {
            return Category::Other;
        };
        let desc = desc.to_lowercase();

        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| desc.contains(kw.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    /// Position of a category in match order (`Other` and unknowns sort last)
    pub fn rank(&self, category: Category) -> usize {
        self.rules
            .iter()
            .position(|(c, _)| *c == category)
            .unwrap_or(self.rules.len())
    }
}

/// Categorize a description with the default keyword table
pub fn categorize(description: Option<&str>) -> Category {
    KeywordTable::default().categorize(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_keyword_maps_to_its_category() {
        let table = KeywordTable::default();
        for (category, keywords) in DEFAULT_KEYWORDS {
            for kw in *keywords {
                // A keyword may also contain an earlier category's keyword,
                // in which case the earlier category wins.
                let expected = DEFAULT_KEYWORDS
                    .iter()
                    .find(|(_, kws)| kws.iter().any(|k| kw.contains(k)))
                    .map(|(c, _)| *c)
                    .unwrap();
                let desc = format!("POS {} 1234", kw.to_uppercase());
                assert_eq!(table.categorize(Some(&desc)), expected, "keyword {}", kw);
                if expected == *category {
                    assert_eq!(table.categorize(Some(kw)), *category);
                }
            }
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(categorize(Some("ZOMATO ORDER #991")), Category::Food);
        assert_eq!(categorize(Some("Netflix.com")), Category::Subscription);
        assert_eq!(categorize(Some("Apollo Pharmacy")), Category::Health);
    }

    #[test]
    fn test_first_category_wins() {
        // "cafe" (Food) and "store" (Shopping) both match; Food is first.
        assert_eq!(categorize(Some("Cafe Store")), Category::Food);
        // "uber" (Transport) is checked before "movie" (Entertainment).
        assert_eq!(categorize(Some("Uber movie tickets")), Category::Transport);
    }

    #[test]
    fn test_unmatched_and_absent_are_other() {
        assert_eq!(categorize(Some("Transfer to savings")), Category::Other);
        assert_eq!(categorize(Some("")), Category::Other);
        assert_eq!(categorize(None), Category::Other);
    }

    #[test]
    fn test_substring_matches_inside_words() {
        // Short keywords match inside longer words.
        assert_eq!(categorize(Some("Monthly rental")), Category::Rent);
        assert_eq!(categorize(Some("Electricity bill")), Category::Bills);
    }

    #[test]
    fn test_custom_table_order() {
        let table = KeywordTable::from_rules(vec![
            (Category::Shopping, vec!["Amazon"]),
            (Category::Subscription, vec!["amazon prime"]),
        ]);
        assert_eq!(table.categorize(Some("AMAZON PRIME VIDEO")), Category::Shopping);
        assert_eq!(table.rank(Category::Subscription), 1);
        assert_eq!(table.rank(Category::Other), 2);
    }
}
