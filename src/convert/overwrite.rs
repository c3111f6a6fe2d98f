//! Overwrite-conflict resolution
//!
//! Run-scoped gatekeeper for every output write. The policy itself never
//! renders anything: when a target exists and no sticky decision is in
//! effect, it asks the collaborator behind [`OverwritePrompt`] and blocks
//! until an answer arrives. A fresh policy is created for every run, so
//! "overwrite all" / "skip all" never leak into the next run.

use std::path::Path;

/// Run-scoped sticky decision state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteDecision {
    /// No "-all" answer given yet this run
    #[default]
    Unset,
    /// Overwrite every remaining conflict without prompting
    AllYes,
    /// Skip every remaining conflict without prompting
    AllNo,
}

/// One answer from the prompt collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteResponse {
    OverwriteOnce,
    SkipOnce,
    OverwriteAll,
    SkipAll,
}

/// Everything the collaborator needs to present a conflict, including
/// both file contents so a comparison can be shown on demand.
#[derive(Debug)]
pub struct OverwriteRequest<'a> {
    /// The output path that already exists
    pub path: &'a Path,
    /// Current content of the existing file, when readable
    pub existing: Option<String>,
    /// The content about to be written
    pub new_content: &'a str,
}

/// The suspension-point boundary to the external collaborator.
///
/// The run blocks inside `resolve` until a response is supplied; there is
/// no timeout.
pub trait OverwritePrompt {
    fn resolve(&mut self, request: &OverwriteRequest) -> OverwriteResponse;
}

/// Per-run overwrite gatekeeper
#[derive(Debug, Default)]
pub struct OverwritePolicy {
    decision: OverwriteDecision,
}

impl OverwritePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decision(&self) -> OverwriteDecision {
        self.decision
    }

    /// Decide whether a write to `path` may proceed.
    ///
    /// A missing target is always authorized. An existing target is
    /// resolved by the sticky decision when one is set, otherwise by
    /// prompting; "-all" answers update the sticky decision for the rest
    /// of the run.
    pub fn authorize(
        &mut self,
        path: &Path,
        new_content: &str,
        prompt: &mut dyn OverwritePrompt,
    ) -> bool {
        if !path.exists() {
            return true;
        }

        match self.decision {
            OverwriteDecision::AllYes => return true,
            OverwriteDecision::AllNo => return false,
            OverwriteDecision::Unset => {}
        }

        let request = OverwriteRequest {
            path,
            existing: std::fs::read_to_string(path).ok(),
            new_content,
        };

        match prompt.resolve(&request) {
            OverwriteResponse::OverwriteOnce => true,
            OverwriteResponse::SkipOnce => false,
            OverwriteResponse::OverwriteAll => {
                self.decision = OverwriteDecision::AllYes;
                true
            }
            OverwriteResponse::SkipAll => {
                self.decision = OverwriteDecision::AllNo;
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedPrompt;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_target_is_authorized_without_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("new.txt");

        let mut policy = OverwritePolicy::new();
        let mut prompt = ScriptedPrompt::new(vec![]);
        assert!(policy.authorize(&target, "content", &mut prompt));
        assert_eq!(prompt.calls, 0);
        assert_eq!(policy.decision(), OverwriteDecision::Unset);
    }

    #[test]
    fn test_once_responses_do_not_stick() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out.txt");
        fs::write(&target, "old").unwrap();

        let mut policy = OverwritePolicy::new();
        let mut prompt = ScriptedPrompt::new(vec![
            OverwriteResponse::OverwriteOnce,
            OverwriteResponse::SkipOnce,
        ]);

        assert!(policy.authorize(&target, "new", &mut prompt));
        assert!(!policy.authorize(&target, "new", &mut prompt));
        assert_eq!(prompt.calls, 2);
        assert_eq!(policy.decision(), OverwriteDecision::Unset);
    }

    #[test]
    fn test_skip_all_sticks_for_the_run() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.txt");
        let second = temp_dir.path().join("b.txt");
        fs::write(&first, "old").unwrap();
        fs::write(&second, "old").unwrap();

        let mut policy = OverwritePolicy::new();
        let mut prompt = ScriptedPrompt::new(vec![OverwriteResponse::SkipAll]);

        assert!(!policy.authorize(&first, "new", &mut prompt));
        assert!(!policy.authorize(&second, "new", &mut prompt));
        assert_eq!(prompt.calls, 1);
        assert_eq!(policy.decision(), OverwriteDecision::AllNo);
    }

    #[test]
    fn test_overwrite_all_sticks_for_the_run() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.txt");
        let second = temp_dir.path().join("b.txt");
        fs::write(&first, "old").unwrap();
        fs::write(&second, "old").unwrap();

        let mut policy = OverwritePolicy::new();
        let mut prompt = ScriptedPrompt::new(vec![OverwriteResponse::OverwriteAll]);

        assert!(policy.authorize(&first, "new", &mut prompt));
        assert!(policy.authorize(&second, "new", &mut prompt));
        assert_eq!(prompt.calls, 1);
    }

    #[test]
    fn test_fresh_policy_starts_unset() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a.txt");
        fs::write(&target, "old").unwrap();

        let mut policy = OverwritePolicy::new();
        let mut prompt = ScriptedPrompt::new(vec![OverwriteResponse::SkipAll]);
        assert!(!policy.authorize(&target, "new", &mut prompt));

        // A new run means a new policy: the prompt is consulted again
        let mut next_policy = OverwritePolicy::new();
        let mut next_prompt = ScriptedPrompt::new(vec![OverwriteResponse::OverwriteOnce]);
        assert!(next_policy.authorize(&target, "new", &mut next_prompt));
        assert_eq!(next_prompt.calls, 1);
    }

    #[test]
    fn test_prompt_receives_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a.txt");
        fs::write(&target, "previous content").unwrap();

        let mut policy = OverwritePolicy::new();
        let mut prompt = ScriptedPrompt::new(vec![OverwriteResponse::SkipOnce]);
        policy.authorize(&target, "new", &mut prompt);

        assert_eq!(
            prompt.seen_existing,
            vec![Some("previous content".to_string())]
        );
    }
}
