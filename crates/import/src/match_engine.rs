use std::collections::HashSet;

use ddsuite_core::{name, Money};

use crate::customers::CustomerTable;
use crate::transactions::TransactionRecord;
use crate::util::sequence_ratio;

/// Weighted full-name similarity in [0.0, 1.0]. The surname carries 60% of
/// the score; surnames discriminate better than given names for this
/// customer base.
pub fn name_score(a: &str, b: &str) -> f64 {
    let (first_a, last_a) = name::first_last(a);
    let (first_b, last_b) = name::first_last(b);

    let first = sequence_ratio(&first_a, &first_b);
    let last = sequence_ratio(&last_a, &last_b);

    0.6 * last + 0.4 * first
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchedTransaction {
    pub reference: String,
    pub collection_date: String,
    pub amount_raw: String,
    /// Signed expected-minus-actual difference.
    pub difference: Money,
    pub score: f64,
}

/// Outcome of one customer's matching step. A blank customer name skips
/// matching entirely; a non-blank name with no surviving candidate is a
/// miss. Both render as empty output fields, but stay distinct here.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    NotAttempted,
    NoMatch,
    Matched(MatchedTransaction),
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

pub struct MatchEngine {
    /// Minimum name score below which a match is never proposed.
    pub acceptance_floor: f64,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self {
            acceptance_floor: 0.6,
        }
    }
}

impl MatchEngine {
    pub fn new(acceptance_floor: f64) -> Self {
        Self { acceptance_floor }
    }

    /// Find the best available transaction for one customer. `used` is the
    /// run's exclusivity ledger: a non-empty reference claimed here becomes
    /// unavailable to every later customer, so callers must process
    /// customers in input-row order. Empty references are never claimed.
    pub fn match_customer(
        &self,
        customer_name: &str,
        expected: Money,
        transactions: &[TransactionRecord],
        used: &mut HashSet<String>,
    ) -> MatchOutcome {
        if customer_name.trim().is_empty() {
            return MatchOutcome::NotAttempted;
        }

        // (transaction index, name score, absolute amount delta)
        let mut candidates: Vec<(usize, f64, Money)> = Vec::new();
        for (idx, tx) in transactions.iter().enumerate() {
            if !tx.reference.is_empty() && used.contains(&tx.reference) {
                continue;
            }
            let score = name_score(customer_name, &tx.account_name);
            if score < self.acceptance_floor {
                continue;
            }
            candidates.push((idx, score, (expected - tx.amount).abs()));
        }

        // Highest score first, closest amount second. The sort is stable,
        // so an exact tie on both keys keeps transaction input order.
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.2.cmp(&b.2)));

        let Some(&(idx, score, _)) = candidates.first() else {
            return MatchOutcome::NoMatch;
        };
        let tx = &transactions[idx];

        if !tx.reference.is_empty() {
            used.insert(tx.reference.clone());
        }

        MatchOutcome::Matched(MatchedTransaction {
            reference: tx.reference.clone(),
            collection_date: tx.collection_date.clone(),
            amount_raw: tx.amount_raw.clone(),
            difference: expected - tx.amount,
            score,
        })
    }

    /// Run every customer row, in table order, against one transaction
    /// list with a fresh exclusivity ledger. One outcome per row.
    pub fn match_all(
        &self,
        customers: &CustomerTable,
        transactions: &[TransactionRecord],
    ) -> Vec<MatchOutcome> {
        let mut used = HashSet::new();
        customers
            .rows
            .iter()
            .map(|row| self.match_customer(&row.name, row.expected, transactions, &mut used))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddsuite_core::parse_amount;

    fn money(s: &str) -> Money {
        parse_amount(s).value()
    }

    fn tx(reference: &str, account_name: &str, amount: &str) -> TransactionRecord {
        TransactionRecord {
            reference: reference.to_string(),
            account_name: account_name.to_string(),
            amount: money(amount),
            amount_raw: amount.to_string(),
            collection_date: "01/08/2026".to_string(),
            code: "17".to_string(),
        }
    }

    fn matched(outcome: &MatchOutcome) -> &MatchedTransaction {
        match outcome {
            MatchOutcome::Matched(m) => m,
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn identical_names_score_one() {
        assert_eq!(name_score("John Smith", "John Smith"), 1.0);
        assert_eq!(name_score("Mr. John Smith", "john smith"), 1.0);
    }

    #[test]
    fn surname_weighs_more_than_given_name() {
        let surname_off = name_score("John Smith", "John Smyth");
        let given_off = name_score("John Smith", "Jon Smith");
        assert!(given_off > surname_off);
    }

    #[test]
    fn closer_spelling_wins_with_zero_delta() {
        let engine = MatchEngine::default();
        let transactions = vec![
            tx("R1", "Jon Smith", "100.00"),
            tx("R2", "John Smyth", "95.00"),
        ];
        // Both candidates clear the floor before selection.
        assert!(name_score("John Smith", "Jon Smith") >= 0.6);
        assert!(name_score("John Smith", "John Smyth") >= 0.6);

        let mut used = HashSet::new();
        let outcome =
            engine.match_customer("John Smith", money("100.00"), &transactions, &mut used);
        let m = matched(&outcome);
        assert_eq!(m.reference, "R1");
        assert_eq!(m.difference.to_plain_string(), "0.00");
    }

    #[test]
    fn below_floor_is_no_match() {
        let engine = MatchEngine::default();
        let transactions = vec![tx("R1", "Zachary Quill", "100.00")];
        let mut used = HashSet::new();
        let outcome =
            engine.match_customer("John Smith", money("100.00"), &transactions, &mut used);
        assert_eq!(outcome, MatchOutcome::NoMatch);
        assert!(used.is_empty());
    }

    #[test]
    fn blank_name_skips_matching_entirely() {
        let engine = MatchEngine::default();
        let transactions = vec![tx("R1", "John Smith", "100.00")];
        let mut used = HashSet::new();
        let outcome = engine.match_customer("   ", money("100.00"), &transactions, &mut used);
        assert_eq!(outcome, MatchOutcome::NotAttempted);
        // The skip is not the same thing as a failed attempt.
        assert_ne!(outcome, MatchOutcome::NoMatch);
        assert!(used.is_empty());
    }

    #[test]
    fn claimed_references_are_exclusive() {
        let engine = MatchEngine::default();
        let transactions = vec![
            tx("R1", "John Smith", "100.00"),
            tx("R2", "John Smith", "100.00"),
        ];
        let mut used = HashSet::new();

        let first =
            engine.match_customer("John Smith", money("100.00"), &transactions, &mut used);
        let second =
            engine.match_customer("John Smith", money("100.00"), &transactions, &mut used);
        let third =
            engine.match_customer("John Smith", money("100.00"), &transactions, &mut used);

        assert_eq!(matched(&first).reference, "R1");
        assert_eq!(matched(&second).reference, "R2");
        assert_eq!(third, MatchOutcome::NoMatch);
    }

    #[test]
    fn empty_reference_is_never_claimed() {
        let engine = MatchEngine::default();
        let transactions = vec![tx("", "John Smith", "100.00")];
        let mut used = HashSet::new();

        let first =
            engine.match_customer("John Smith", money("100.00"), &transactions, &mut used);
        let second =
            engine.match_customer("John Smith", money("100.00"), &transactions, &mut used);

        // Both customers land on the same reference-less transaction.
        assert_eq!(matched(&first).reference, "");
        assert_eq!(matched(&second).reference, "");
        assert!(used.is_empty());
    }

    #[test]
    fn amount_breaks_score_ties() {
        let engine = MatchEngine::default();
        // Same account name either way; only the delta differs.
        let transactions = vec![
            tx("R1", "John Smith", "95.00"),
            tx("R2", "John Smith", "100.00"),
        ];
        let mut used = HashSet::new();
        let outcome =
            engine.match_customer("John Smith", money("100.00"), &transactions, &mut used);
        assert_eq!(matched(&outcome).reference, "R2");
    }

    #[test]
    fn exact_tie_keeps_transaction_input_order() {
        let engine = MatchEngine::default();
        let forward = vec![
            tx("R1", "John Smith", "100.00"),
            tx("R2", "John Smith", "100.00"),
        ];
        let reversed = vec![
            tx("R2", "John Smith", "100.00"),
            tx("R1", "John Smith", "100.00"),
        ];

        let mut used = HashSet::new();
        let first = engine.match_customer("John Smith", money("100.00"), &forward, &mut used);
        assert_eq!(matched(&first).reference, "R1");

        // The same tie resolved against the other ordering flips the winner.
        let mut used = HashSet::new();
        let second = engine.match_customer("John Smith", money("100.00"), &reversed, &mut used);
        assert_eq!(matched(&second).reference, "R2");
    }

    #[test]
    fn reordering_without_ties_changes_nothing() {
        let engine = MatchEngine::default();
        let forward = vec![
            tx("R1", "Jon Smith", "100.00"),
            tx("R2", "John Smyth", "95.00"),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let mut used = HashSet::new();
        let a = engine.match_customer("John Smith", money("100.00"), &forward, &mut used);
        let mut used = HashSet::new();
        let b = engine.match_customer("John Smith", money("100.00"), &reversed, &mut used);

        assert_eq!(matched(&a).reference, matched(&b).reference);
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        use crate::customers::{read_customers, CustomerColumns};

        let customers_csv = "Name,Total Cost\nJohn Smith,100.00\nJane Doe,45.50\n,10.00\n";
        let transactions = vec![
            tx("R1", "Jon Smith", "100.00"),
            tx("R2", "Jane Doe", "45.50"),
        ];
        let engine = MatchEngine::default();

        let run = || {
            let table =
                read_customers(customers_csv.as_bytes(), &CustomerColumns::default()).unwrap();
            engine.match_all(&table, &transactions)
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn match_all_processes_rows_in_order() {
        use crate::customers::{read_customers, CustomerColumns};

        // Both rows want R1; the earlier row wins the contested reference.
        let customers_csv = "Name,Total Cost\nJon Smith,100.00\nJohn Smith,100.00\n";
        let transactions = vec![tx("R1", "Jon Smith", "100.00")];
        let table =
            read_customers(customers_csv.as_bytes(), &CustomerColumns::default()).unwrap();

        let outcomes = MatchEngine::default().match_all(&table, &transactions);
        assert!(outcomes[0].is_matched());
        assert_eq!(outcomes[1], MatchOutcome::NoMatch);
    }

    #[test]
    fn excluded_new_instruction_never_matches() {
        use crate::transactions::{read_transactions, TransactionColumns};

        // The only high-scoring candidate is a new-instruction row.
        let data = "DD Reference,Account Name,Amount,Bacs Code\nR1,John Smith,100.00,0N\n";
        let load = read_transactions(data.as_bytes(), &TransactionColumns::default()).unwrap();

        let mut used = HashSet::new();
        let outcome = MatchEngine::default().match_customer(
            "John Smith",
            money("100.00"),
            &load.transactions,
            &mut used,
        );
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }
}
