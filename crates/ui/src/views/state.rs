use services::Remote;

const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// A request failed; carries the message to show.
    Request(String),
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ViewError::Unknown => FALLBACK_MESSAGE,
            ViewError::Request(message) => message,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Idle => ViewState::Idle,
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(value) => ViewState::Ready(f(value)),
            ViewState::Error(err) => ViewState::Error(err),
        }
    }
}

/// Read one store slot as a view state, mapping the ready value.
#[must_use]
pub fn view_state_from_remote<T, U>(remote: &Remote<T>, f: impl FnOnce(&T) -> U) -> ViewState<U> {
    match remote {
        Remote::Idle => ViewState::Idle,
        Remote::Loading => ViewState::Loading,
        Remote::Ready(value) => ViewState::Ready(f(value)),
        Remote::Failed(message) if message.trim().is_empty() => {
            ViewState::Error(ViewError::Unknown)
        }
        Remote::Failed(message) => ViewState::Error(ViewError::Request(message.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_slots_map_to_view_states() {
        assert_eq!(view_state_from_remote(&Remote::<u32>::Idle, |v| *v), ViewState::Idle);
        assert_eq!(
            view_state_from_remote(&Remote::Ready(2_u32), |v| v * 10),
            ViewState::Ready(20)
        );
        assert_eq!(
            view_state_from_remote(&Remote::<u32>::Failed("offline".into()), |v| *v),
            ViewState::Error(ViewError::Request("offline".into()))
        );
    }

    #[test]
    fn blank_failures_use_the_fallback_message() {
        let state = view_state_from_remote(&Remote::<u32>::Failed("  ".into()), |v| *v);
        let ViewState::Error(err) = state else {
            panic!("expected error state");
        };
        assert_eq!(err.message(), FALLBACK_MESSAGE);
    }
}
