//! Step id conventions.
//!
//! Steps instantiated from a molecule template are numbered children of the
//! root: `gt-abc` owns `gt-abc.1`, `gt-abc.2`, ... This module recovers the
//! molecule id from a step id without any precompiled global matcher.

/// Separator between the molecule id and the step number.
pub const STEP_SEPARATOR: char = '.';

/// Return the molecule id that owns `step_id`, or `None` if `step_id` is not
/// of the form `<molecule>.<digits>`.
///
/// The split happens at the last separator, so molecule ids may themselves
/// contain dots or dashes.
#[must_use]
pub fn molecule_id_from_step(step_id: &str) -> Option<&str> {
    let (molecule, number) = step_id.rsplit_once(STEP_SEPARATOR)?;
    if molecule.is_empty() || number.is_empty() {
        return None;
    }
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(molecule)
}

/// Parse the step number from `step_id`.
#[must_use]
pub fn step_number(step_id: &str) -> Option<u64> {
    molecule_id_from_step(step_id)?;
    let (_, number) = step_id.rsplit_once(STEP_SEPARATOR)?;
    number.parse().ok()
}
