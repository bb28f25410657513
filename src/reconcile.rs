//! Pairs bank statement transactions with budget entries.
//!
//! Bank transactions are processed greedily in input order. Each one looks at the budget entries
//! with exactly the same amount that haven't been claimed yet and picks the one dated closest on or
//! before its own date. That entry is accepted if it lies within the configured date window, and
//! is then no longer available to later bank transactions. An earlier bank transaction can claim an
//! entry that would have been a better fit for a later one; results depend on input order.

use chrono::TimeDelta;
use std::collections::HashMap;

use crate::ledger::{Amount, Transaction};

pub const DEFAULT_DATE_MATCH_RANGE_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Maximum number of days a budget entry may precede the bank transaction it matches
    pub date_match_range_days: u32,

    /// Record bank transactions that had more than one candidate
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            date_match_range_days: DEFAULT_DATE_MATCH_RANGE_DAYS,
            verbose: false,
        }
    }
}

/// A bank transaction that had more than one unclaimed budget entry with the same amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    pub source: usize,
    pub candidates: Vec<usize>,
    pub chosen: Option<usize>,
}

/// Outcome of a reconciliation run. Matches are stored as indices into the two input slices and
/// always point both ways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<'a> {
    source: &'a [Transaction],
    candidates: &'a [Transaction],
    source_matches: Vec<Option<usize>>,
    candidate_matches: Vec<Option<usize>>,
    ambiguities: Vec<Ambiguity>,
}

pub fn reconcile<'a>(
    source: &'a [Transaction],
    candidates: &'a [Transaction],
    config: &MatchConfig,
) -> Reconciliation<'a> {
    let window = TimeDelta::days(i64::from(config.date_match_range_days));
    let buckets = candidates_by_amount(candidates);
    let mut reconciliation = Reconciliation::new(source, candidates);

    for (source_index, transaction) in source.iter().enumerate() {
        let pool: Vec<usize> = buckets
            .get(&transaction.amount)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&candidate| !reconciliation.is_candidate_matched(candidate))
            .collect();

        let chosen = closest_preceding(transaction, &pool, candidates)
            .filter(|&(_, delta)| delta <= window)
            .map(|(candidate, _)| candidate);
        if let Some(candidate) = chosen {
            reconciliation.link(source_index, candidate);
        }

        if config.verbose && pool.len() > 1 {
            reconciliation.ambiguities.push(Ambiguity {
                source: source_index,
                candidates: pool,
                chosen,
            });
        }
    }

    reconciliation
}

/// Candidate indices grouped by amount, each group in input order
fn candidates_by_amount(candidates: &[Transaction]) -> HashMap<Amount, Vec<usize>> {
    let mut buckets: HashMap<Amount, Vec<usize>> = HashMap::new();
    for (index, candidate) in candidates.iter().enumerate() {
        buckets.entry(candidate.amount).or_default().push(index);
    }
    buckets
}

/// The candidate with the smallest non-negative `transaction.date - candidate.date`.
/// Candidates dated after the transaction are never chosen. On ties the first one in `pool` wins.
fn closest_preceding(
    transaction: &Transaction,
    pool: &[usize],
    candidates: &[Transaction],
) -> Option<(usize, TimeDelta)> {
    let mut closest: Option<(usize, TimeDelta)> = None;
    for &candidate in pool {
        let delta = transaction
            .date
            .signed_duration_since(candidates[candidate].date);
        if delta < TimeDelta::zero() {
            continue;
        }
        if closest.map_or(true, |(_, closest_delta)| delta < closest_delta) {
            closest = Some((candidate, delta));
        }
    }
    closest
}

impl<'a> Reconciliation<'a> {
    fn new(source: &'a [Transaction], candidates: &'a [Transaction]) -> Self {
        Self {
            source,
            candidates,
            source_matches: vec![None; source.len()],
            candidate_matches: vec![None; candidates.len()],
            ambiguities: vec![],
        }
    }

    fn link(&mut self, source: usize, candidate: usize) {
        debug_assert!(
            self.source_matches[source].is_none() && self.candidate_matches[candidate].is_none(),
            "A match can't be reassigned",
        );
        self.source_matches[source] = Some(candidate);
        self.candidate_matches[candidate] = Some(source);
    }

    fn is_candidate_matched(&self, candidate: usize) -> bool {
        self.candidate_matches[candidate].is_some()
    }

    pub fn source(&self) -> &'a [Transaction] {
        self.source
    }

    pub fn candidates(&self) -> &'a [Transaction] {
        self.candidates
    }

    /// Index of the candidate matched to `source[index]`
    pub fn source_match(&self, index: usize) -> Option<usize> {
        self.source_matches[index]
    }

    /// Index of the source transaction matched to `candidates[index]`
    pub fn candidate_match(&self, index: usize) -> Option<usize> {
        self.candidate_matches[index]
    }

    /// Each source transaction together with the candidate it matched, if any
    pub fn source_with_matches(
        &self,
    ) -> impl Iterator<Item = (&'a Transaction, Option<&'a Transaction>)> + '_ {
        let candidates = self.candidates;
        self.source
            .iter()
            .zip(&self.source_matches)
            .map(move |(transaction, matched)| {
                (transaction, matched.map(move |index| &candidates[index]))
            })
    }

    /// Matched (source, candidate) pairs in source order
    pub fn pairs(&self) -> impl Iterator<Item = (&'a Transaction, &'a Transaction)> + '_ {
        self.source_with_matches()
            .filter_map(|(transaction, matched)| Some((transaction, matched?)))
    }

    /// Source transactions without a match, in input order
    pub fn missing(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.source_with_matches()
            .filter(|(_, matched)| matched.is_none())
            .map(|(transaction, _)| transaction)
    }

    /// Candidates that no source transaction claimed, in input order
    pub fn unmatched_candidates(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.candidates
            .iter()
            .zip(&self.candidate_matches)
            .filter(|(_, matched)| matched.is_none())
            .map(|(candidate, _)| candidate)
    }

    pub fn match_count(&self) -> usize {
        self.source_matches.iter().flatten().count()
    }

    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }
}
