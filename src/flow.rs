//! Máquina de estados por flujo: `Idle → Requesting → {Succeeded, Failed}`.
//!
//! Cada `begin` emite un ticket nuevo; sólo el ticket más reciente puede completar el
//! flujo. Una petición antigua que resuelve tarde queda descartada en lugar de pisar
//! el resultado de la más nueva.

use crate::error::AnalysisError;

/// Identifica una petición concreta dentro de un flujo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTicket(u64);

/// Estado visible de un flujo.
#[derive(Debug)]
pub enum FlowState<T> {
    Idle,
    Requesting {
        ticket: FlowTicket,
    },
    Succeeded(T),
    Failed(AnalysisError),
}

impl<T> Default for FlowState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Qué pasó con el resultado entregado a [`Flow::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// El ticket ya no es el vigente; el resultado se ignoró.
    Superseded,
}

/// Flujo de peticiones con su estado y el contador de tickets emitidos.
#[derive(Debug)]
pub struct Flow<T> {
    state: FlowState<T>,
    /// Último valor correcto desplazado por un `begin`; un fallo no lo borra.
    previous: Option<T>,
    issued: u64,
}

impl<T> Default for Flow<T> {
    fn default() -> Self {
        Self {
            state: FlowState::default(),
            previous: None,
            issued: 0,
        }
    }
}

impl<T> Flow<T> {
    pub fn state(&self) -> &FlowState<T> {
        &self.state
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self.state, FlowState::Requesting { .. })
    }

    pub fn succeeded(&self) -> Option<&T> {
        match &self.state {
            FlowState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// Resultado correcto más reciente, aunque una petición posterior esté en curso o
    /// haya fallado.
    pub fn last_succeeded(&self) -> Option<&T> {
        self.succeeded().or(self.previous.as_ref())
    }

    /// Pasa a `Requesting`. El resultado anterior deja de ser el vigente (queda sólo en
    /// [`Flow::last_succeeded`]) y cualquier ticket previo queda invalidado.
    pub fn begin(&mut self) -> FlowTicket {
        self.issued += 1;
        let ticket = FlowTicket(self.issued);
        if let FlowState::Succeeded(value) =
            std::mem::replace(&mut self.state, FlowState::Requesting { ticket })
        {
            self.previous = Some(value);
        }
        ticket
    }

    pub fn complete(&mut self, ticket: FlowTicket, outcome: Result<T, AnalysisError>) -> Completion {
        let current = matches!(self.state, FlowState::Requesting { ticket: t } if t == ticket);
        if !current {
            return Completion::Superseded;
        }
        self.state = match outcome {
            Ok(value) => {
                self.previous = None;
                FlowState::Succeeded(value)
            }
            Err(err) => FlowState::Failed(err),
        };
        Completion::Applied
    }

    /// Tras mostrar el fallo al usuario el flujo vuelve a `Idle`.
    pub fn acknowledge(&mut self) -> Option<AnalysisError> {
        match std::mem::take(&mut self.state) {
            FlowState::Failed(err) => Some(err),
            other => {
                self.state = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_then_success() {
        let mut flow: Flow<u32> = Flow::default();
        assert!(matches!(flow.state(), FlowState::Idle));

        let ticket = flow.begin();
        assert!(flow.is_requesting());
        assert_eq!(flow.complete(ticket, Ok(7)), Completion::Applied);
        assert_eq!(flow.succeeded(), Some(&7));
    }

    #[test]
    fn failure_returns_to_idle_once_acknowledged() {
        let mut flow: Flow<u32> = Flow::default();
        let ticket = flow.begin();
        flow.complete(ticket, Err(AnalysisError::EmptyResult("result")));

        assert!(matches!(flow.state(), FlowState::Failed(_)));
        assert!(matches!(
            flow.acknowledge(),
            Some(AnalysisError::EmptyResult("result"))
        ));
        assert!(matches!(flow.state(), FlowState::Idle));
        assert!(flow.acknowledge().is_none());
    }

    #[test]
    fn acknowledge_keeps_success() {
        let mut flow: Flow<u32> = Flow::default();
        let ticket = flow.begin();
        flow.complete(ticket, Ok(1));
        assert!(flow.acknowledge().is_none());
        assert_eq!(flow.succeeded(), Some(&1));
    }

    #[test]
    fn stale_ticket_cannot_clobber_newer_request() {
        let mut flow: Flow<&str> = Flow::default();
        let first = flow.begin();
        let second = flow.begin();

        assert_eq!(flow.complete(second, Ok("new")), Completion::Applied);
        assert_eq!(flow.complete(first, Ok("old")), Completion::Superseded);
        assert_eq!(flow.succeeded(), Some(&"new"));
    }

    #[test]
    fn stale_ticket_is_ignored_while_newer_is_pending() {
        let mut flow: Flow<&str> = Flow::default();
        let first = flow.begin();
        let _second = flow.begin();

        assert_eq!(flow.complete(first, Ok("old")), Completion::Superseded);
        assert!(flow.is_requesting());
    }

    #[test]
    fn failed_retry_keeps_last_success_available() {
        let mut flow: Flow<&str> = Flow::default();
        let first = flow.begin();
        flow.complete(first, Ok("book"));

        let retry = flow.begin();
        assert_eq!(flow.succeeded(), None);
        assert_eq!(flow.last_succeeded(), Some(&"book"));

        flow.complete(retry, Err(AnalysisError::NetworkFailure("timeout".into())));
        assert!(flow.acknowledge().is_some());
        assert_eq!(flow.last_succeeded(), Some(&"book"));

        let third = flow.begin();
        flow.complete(third, Ok("other"));
        assert_eq!(flow.last_succeeded(), Some(&"other"));
    }
}
