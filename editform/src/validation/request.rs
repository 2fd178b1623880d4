use std::sync::Arc;

/// Which members of a model a validation run covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MemberSelector {
    /// Every rule runs.
    #[default]
    All,
    /// Only rules for the listed member paths (and members nested under
    /// them) run.
    Members(Vec<String>),
}

impl MemberSelector {
    /// Check if rules declared directly on `path` should run.
    ///
    /// A member `m` selects `m` itself and everything nested below it.
    pub fn selects(&self, path: &str) -> bool {
        match self {
            Self::All => true,
            Self::Members(members) => members
                .iter()
                .any(|member| member == path || is_parent(member, path)),
        }
    }

    /// Check if a nested rule set rooted at `path` has to be entered.
    ///
    /// True when `path` is selected, or when a selected member lies below
    /// `path`.
    pub fn enters(&self, path: &str) -> bool {
        match self {
            Self::All => true,
            Self::Members(members) => members
                .iter()
                .any(|member| member == path || is_parent(member, path) || is_parent(path, member)),
        }
    }
}

/// `parent` is a strict dot-prefix of `path`.
fn is_parent(parent: &str, path: &str) -> bool {
    path.len() > parent.len()
        && path.starts_with(parent)
        && path.as_bytes()[parent.len()] == b'.'
}

/// Input of a validation run: a model snapshot and the members to cover.
#[derive(Debug)]
pub struct ValidationRequest<M> {
    model: Arc<M>,
    selector: MemberSelector,
}

impl<M> ValidationRequest<M> {
    /// Validate every member of `model`.
    pub fn whole(model: Arc<M>) -> Self {
        Self {
            model,
            selector: MemberSelector::All,
        }
    }

    /// Validate only the given members of `model`.
    pub fn members<I, S>(model: Arc<M>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model,
            selector: MemberSelector::Members(members.into_iter().map(Into::into).collect()),
        }
    }

    /// The model being validated.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Shared handle to the model snapshot.
    pub fn model_arc(&self) -> &Arc<M> {
        &self.model
    }

    /// The members this run covers.
    pub fn selector(&self) -> &MemberSelector {
        &self.selector
    }
}

impl<M> Clone for ValidationRequest<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            selector: self.selector.clone(),
        }
    }
}
