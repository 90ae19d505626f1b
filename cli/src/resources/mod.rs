//! Idempotent link primitives (check + place pattern).
pub mod backup;
pub mod helpers;
pub mod identity;
pub mod symlink;

/// State of a link target in the home directory.
///
/// # Examples
///
/// ```
/// use dotlink::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let taken = ResourceState::Occupied { current: "target is a regular file".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(taken, ResourceState::Placeholder);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the target.
    Missing,
    /// The target already refers to the source.
    Correct,
    /// The target is an empty real directory standing in for a directory
    /// source; it may be replaced without force.
    Placeholder,
    /// Something unrelated occupies the target.
    Occupied {
        /// Description of the occupant.
        current: String,
    },
}

/// Result of placing a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link was (or, under dry-run, would be) created.
    Linked,
    /// The target already referred to the source.
    Skipped,
    /// The target is occupied and force was not given.
    Conflict {
        /// Why the target could not be replaced.
        reason: String,
    },
}

/// Flags controlling how a link is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Report actions without touching the filesystem.
    pub dry_run: bool,
    /// Back up and replace occupied targets.
    pub force: bool,
}
