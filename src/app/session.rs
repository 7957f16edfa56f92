use tracing::{debug, info};

use crate::config::Config;
use crate::topology::{Credentials, Selection, TopologyClient, TopologyStore};

use super::connect::{ConnectionFlow, FetchOutcome};

pub(in crate::app) const CONNECT_FAILED_NOTICE: &str =
    "Failed to connect to vCenter. Check the connection details and try again.";
pub(in crate::app) const MISSING_FIELDS_NOTICE: &str = "Host and username are required.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Clone, Debug, Default)]
pub(in crate::app) struct CredentialForm {
    pub(in crate::app) host: String,
    pub(in crate::app) username: String,
    pub(in crate::app) password: String,
    pub(in crate::app) port: u16,
}

impl CredentialForm {
    pub(in crate::app) fn from_config(config: &Config) -> Self {
        Self {
            host: config.host.clone(),
            username: config.username.clone(),
            password: String::new(),
            port: config.port,
        }
    }

    fn credentials(&self) -> Option<Credentials> {
        let host = self.host.trim();
        let username = self.username.trim();
        if host.is_empty() || username.is_empty() {
            return None;
        }

        Some(Credentials {
            host: host.to_owned(),
            username: username.to_owned(),
            password: self.password.clone(),
            port: self.port,
        })
    }
}

pub(in crate::app) struct Session {
    pub(in crate::app) store: TopologyStore,
    pub(in crate::app) selection: Selection,
    pub(in crate::app) search: String,
    pub(in crate::app) form: CredentialForm,
    pub(in crate::app) dialog_open: bool,
    pub(in crate::app) notice: Option<String>,
    pub(in crate::app) flow: ConnectionFlow,
    requested_host: Option<String>,
    connected_host: Option<String>,
}

impl Session {
    pub(in crate::app) fn new(form: CredentialForm) -> Self {
        Self {
            store: TopologyStore::default(),
            selection: Selection::default(),
            search: String::new(),
            form,
            dialog_open: true,
            notice: None,
            flow: ConnectionFlow::default(),
            requested_host: None,
            connected_host: None,
        }
    }

    pub(in crate::app) fn status(&self) -> ConnectionStatus {
        if self.flow.is_pending() {
            ConnectionStatus::Connecting
        } else if self.connected_host.is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    pub(in crate::app) fn connected_host(&self) -> Option<&str> {
        self.connected_host.as_deref()
    }

    pub(in crate::app) fn submit(&mut self, client: &TopologyClient) {
        let Some(credentials) = self.form.credentials() else {
            self.notice = Some(MISSING_FIELDS_NOTICE.to_owned());
            return;
        };

        self.notice = None;
        self.requested_host = Some(credentials.host.clone());
        let generation = self.flow.start(client, credentials);
        debug!(generation, "submitted connection form");
    }

    /// Applies a finished request, if any. Returns true when a new snapshot
    /// was loaded.
    pub(in crate::app) fn poll(&mut self) -> bool {
        match self.flow.poll() {
            Some(outcome) => self.apply_outcome(outcome),
            None => false,
        }
    }

    pub(in crate::app) fn apply_outcome(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Loaded(snapshot) => {
                let (nodes, edges) = snapshot.into_parts();
                self.store.load(nodes, edges);
                self.selection.clear();
                self.connected_host = self.requested_host.take();
                self.dialog_open = false;
                self.notice = None;
                info!(host = self.connected_host.as_deref(), "connected");
                true
            }
            FetchOutcome::Failed(reason) => {
                debug!(reason = reason.as_str(), "keeping previous topology after failed request");
                self.requested_host = None;
                self.dialog_open = true;
                self.notice = Some(CONNECT_FAILED_NOTICE.to_owned());
                false
            }
        }
    }

    pub(in crate::app) fn reopen_dialog(&mut self) {
        self.notice = None;
        self.dialog_open = true;
    }

    /// The dialog only closes once a topology is loaded.
    pub(in crate::app) fn dismiss_dialog(&mut self) {
        if self.connected_host.is_some() && !self.flow.is_pending() {
            self.dialog_open = false;
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::connect::tests::wait_for_outcome;
    use super::*;
    use crate::topology::TopologySnapshot;
    use crate::topology::fixtures::{edge, node};

    fn form() -> CredentialForm {
        CredentialForm {
            host: "vcenter.lab".to_owned(),
            username: "admin".to_owned(),
            password: "pw".to_owned(),
            port: 443,
        }
    }

    fn first_snapshot() -> TopologySnapshot {
        TopologySnapshot::new(
            vec![node("a", "vm", "web01"), node("b", "host", "esx01")],
            vec![edge("e1", "a", "b", "compute")],
        )
    }

    fn unreachable_client() -> TopologyClient {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        drop(listener);
        TopologyClient::new(&base, Duration::from_secs(2)).expect("client")
    }

    #[test]
    fn first_failed_attempt_keeps_store_empty_and_dialog_open() {
        let mut session = Session::new(form());
        session.submit(&unreachable_client());
        assert_eq!(session.status(), ConnectionStatus::Connecting);

        let outcome = wait_for_outcome(&mut session.flow);
        assert!(!session.apply_outcome(outcome));

        assert!(session.store.current().is_empty());
        assert!(session.dialog_open);
        assert_eq!(session.notice.as_deref(), Some(CONNECT_FAILED_NOTICE));
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn failed_reconnect_keeps_previous_snapshot() {
        let mut session = Session::new(form());
        session.requested_host = Some("vcenter.lab".to_owned());
        assert!(session.apply_outcome(FetchOutcome::Loaded(first_snapshot())));
        session.selection.select("a");

        session.reopen_dialog();
        assert!(!session.apply_outcome(FetchOutcome::Failed("timed out".to_owned())));

        assert_eq!(session.store.current(), &first_snapshot());
        assert_eq!(session.selection.selected_id(), Some("a"));
        assert!(session.dialog_open);
        assert_eq!(session.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn successful_load_replaces_snapshot_and_closes_dialog() {
        let mut session = Session::new(form());
        session.requested_host = Some("vcenter.lab".to_owned());
        session.apply_outcome(FetchOutcome::Loaded(first_snapshot()));
        session.selection.select("b");

        session.requested_host = Some("vcenter-2.lab".to_owned());
        let replacement = TopologySnapshot::new(vec![node("c", "datastore", "ds01")], Vec::new());
        assert!(session.apply_outcome(FetchOutcome::Loaded(replacement)));

        assert!(session.store.current().node("a").is_none());
        assert_eq!(session.store.current().node_count(), 1);
        assert!(!session.selection.is_open());
        assert!(!session.dialog_open);
        assert_eq!(session.connected_host(), Some("vcenter-2.lab"));
    }

    #[test]
    fn submit_requires_host_and_username() {
        let mut session = Session::new(CredentialForm {
            host: "  ".to_owned(),
            ..form()
        });
        session.submit(&unreachable_client());

        assert_eq!(session.notice.as_deref(), Some(MISSING_FIELDS_NOTICE));
        assert!(!session.flow.is_pending());
    }

    #[test]
    fn dialog_cannot_be_dismissed_before_connecting() {
        let mut session = Session::new(form());
        session.dismiss_dialog();
        assert!(session.dialog_open);

        session.requested_host = Some("vcenter.lab".to_owned());
        session.apply_outcome(FetchOutcome::Loaded(first_snapshot()));
        session.reopen_dialog();
        session.dismiss_dialog();
        assert!(!session.dialog_open);
    }
}
