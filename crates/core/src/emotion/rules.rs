/// One keyword rule: the label applies when any keyword appears as a
/// substring of the (lowercased) input.
#[derive(Clone, Debug)]
pub struct Rule<L> {
    pub label: L,
    pub keywords: Vec<String>,
}

impl<L> Rule<L> {
    pub fn new<I, S>(label: L, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    fn first_hit(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|kw| text.contains(kw))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit<L> {
    pub label: L,
    pub keyword: String,
}

/// Result of evaluating a rule set. `label` is the winning label; `hits`
/// lists every rule that matched, in priority order, so callers can see
/// when more than one rule applied instead of having the tie silently
/// resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation<L> {
    pub label: L,
    pub hits: Vec<Hit<L>>,
}

impl<L> Evaluation<L> {
    pub fn ambiguous(&self) -> bool {
        self.hits.len() > 1
    }
}

/// Ordered keyword rules with a default label. Rules are checked in the
/// order given; the first rule with a matching keyword wins.
#[derive(Clone, Debug)]
pub struct RuleSet<L> {
    rules: Vec<Rule<L>>,
    default: L,
}

impl<L: Clone + std::fmt::Debug> RuleSet<L> {
    pub fn new(rules: Vec<Rule<L>>, default: L) -> Self {
        Self { rules, default }
    }

    pub fn eval(&self, text: &str) -> L {
        self.eval_detailed(text).label
    }

    pub fn eval_detailed(&self, text: &str) -> Evaluation<L> {
        let haystack = text.to_lowercase();
        let hits: Vec<Hit<L>> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.first_hit(&haystack).map(|kw| Hit {
                    label: rule.label.clone(),
                    keyword: kw.to_owned(),
                })
            })
            .collect();

        let label = match hits.first() {
            Some(hit) => hit.label.clone(),
            None => self.default.clone(),
        };

        if hits.len() > 1 {
            tracing::debug!(?label, hits = hits.len(), "multiple rules matched, first wins");
        }

        Evaluation { label, hits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> RuleSet<&'static str> {
        RuleSet::new(
            vec![
                Rule::new("red", ["apple", "cherry"]),
                Rule::new("yellow", ["banana", "lemon"]),
            ],
            "gray",
        )
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(colors().eval("a cherry on top"), "red");
        assert_eq!(colors().eval("one lemon please"), "yellow");
    }

    #[test]
    fn default_when_no_rule_matches() {
        assert_eq!(colors().eval("just water"), "gray");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(colors().eval("BANANA bread"), "yellow");
    }

    #[test]
    fn both_match_reports_ambiguity_but_keeps_priority_order() {
        let eval = colors().eval_detailed("apple and banana salad");
        assert_eq!(eval.label, "red");
        assert!(eval.ambiguous());
        assert_eq!(eval.hits.len(), 2);
        assert_eq!(eval.hits[0].keyword, "apple");
    }

    #[test]
    fn unambiguous_match_has_single_hit() {
        let eval = colors().eval_detailed("apple pie");
        assert!(!eval.ambiguous());
        assert_eq!(eval.hits, vec![Hit { label: "red", keyword: "apple".to_owned() }]);
    }
}
