use strsim::levenshtein;

/// Find the closest candidate to a misspelled name, ignoring case.
pub fn find_similar<'a>(target: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let target = target.to_lowercase();
    candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein(&target, &candidate.to_lowercase())))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(name, _)| name)
}
