//! Property-ID synchronization (RFC 6350 §7).
//!
//! Every property instance gets a `PID` of the form `local.client`, where
//! `client` refers to a `CLIENTPIDMAP` row naming the application that
//! assigned it. Two revisions of a card edited by different applications
//! can then be merged property by property.
//!
//! The application identity is process-wide. Register it once at startup;
//! reset it only between unrelated synchronization sessions.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use cardwire_core::error::CoreError;
use serde::Serialize;

use crate::error::RfcResult;
use crate::rfc::vcard::core::{ParsedRow, Parameters, PropertyId, names};

static APP_IDENTITY: RwLock<Option<String>> = RwLock::new(None);

/// Registers the application identity for this process.
///
/// Returns `false` if an identity was already registered; the first one
/// stays in effect.
pub fn register_once(uri: impl Into<String>) -> bool {
    let mut identity = APP_IDENTITY.write().unwrap_or_else(PoisonError::into_inner);
    if identity.is_some() {
        return false;
    }
    let uri = uri.into();
    tracing::debug!(uri = %uri, "Registered application identity");
    *identity = Some(uri);
    true
}

/// Returns the registered application identity.
#[must_use]
pub fn current_app() -> Option<String> {
    APP_IDENTITY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Forgets the registered application identity.
pub fn reset_registration() {
    *APP_IDENTITY.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Generates a fresh `urn:uuid:` application identity.
#[must_use]
pub fn generate_app_uri() -> String {
    format!("urn:uuid:{}", uuid::Uuid::new_v4())
}

/// One `CLIENTPIDMAP` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientPidMap {
    pub source_id: u32,
    pub uri: String,
}

impl ClientPidMap {
    /// Parses a raw `CLIENTPIDMAP` value (`1;urn:uuid:...`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (source_id, uri) = value.split_once(';')?;
        let uri = uri.trim();
        if uri.is_empty() {
            return None;
        }
        Some(Self {
            source_id: source_id.trim().parse().ok()?,
            uri: uri.to_string(),
        })
    }

    /// The value as written on a `CLIENTPIDMAP` line.
    #[must_use]
    pub fn to_value(&self) -> String {
        format!("{};{}", self.source_id, self.uri)
    }
}

/// Assigns property IDs within one card.
///
/// Invariant: a (property name, local ID) pair is never handed out twice.
/// [`PidSynchronizer::reset`] clears the IDs and the client table together.
#[derive(Debug, Default)]
pub struct PidSynchronizer {
    app: Option<String>,
    used: HashMap<String, BTreeSet<u32>>,
    clients: Vec<ClientPidMap>,
}

impl PidSynchronizer {
    /// Creates a synchronizer that uses the process-wide identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a synchronizer bound to `uri` instead of the process-wide
    /// identity.
    #[must_use]
    pub fn with_app(uri: impl Into<String>) -> Self {
        Self {
            app: Some(uri.into()),
            ..Self::default()
        }
    }

    /// Learns the IDs and client map entries already present in a card.
    pub fn observe(&mut self, row: &ParsedRow) {
        if row.is(names::CLIENTPIDMAP) {
            match ClientPidMap::parse(&row.value) {
                Some(entry) if !self.clients.iter().any(|c| c.source_id == entry.source_id) => {
                    self.clients.push(entry);
                }
                Some(_) => {}
                None => tracing::debug!(value = %row.value, "Ignoring malformed CLIENTPIDMAP"),
            }
        }

        if !row.parameters.pids.is_empty() {
            let ids = self.used.entry(row.name.to_ascii_uppercase()).or_default();
            ids.extend(row.parameters.pids.iter().map(|pid| pid.local_id));
        }
    }

    /// Gives a property a fresh ID from the current application.
    ///
    /// If `params` already carries an ID from this application, that ID is
    /// returned unchanged.
    ///
    /// ## Errors
    /// Returns `CoreError::InvariantViolation` if no application identity is
    /// registered or the local IDs for `name` are exhausted.
    pub fn assign(&mut self, name: &str, params: &mut Parameters) -> RfcResult<PropertyId> {
        let app = self
            .app
            .clone()
            .or_else(current_app)
            .ok_or(CoreError::InvariantViolation(
                "no application identity registered",
            ))?;
        let client_id = self.client_id_for(&app)?;

        if let Some(existing) = params
            .pids
            .iter()
            .find(|pid| pid.client_id == Some(client_id))
        {
            return Ok(*existing);
        }

        let ids = self.used.entry(name.to_ascii_uppercase()).or_default();
        let local_id = match ids.last() {
            Some(last) => last
                .checked_add(1)
                .ok_or(CoreError::InvariantViolation("property IDs exhausted"))?,
            None => 1,
        };
        ids.insert(local_id);

        let pid = PropertyId::new(local_id, Some(client_id));
        params.pids.push(pid);
        tracing::trace!(name, pid = %pid, "Assigned property ID");
        Ok(pid)
    }

    /// Client map entries, observed ones first.
    #[must_use]
    pub fn client_pid_maps(&self) -> &[ClientPidMap] {
        &self.clients
    }

    /// Whether `local_id` is taken for `name`.
    #[must_use]
    pub fn is_used(&self, name: &str, local_id: u32) -> bool {
        self.used
            .get(&name.to_ascii_uppercase())
            .is_some_and(|ids| ids.contains(&local_id))
    }

    /// Clears all assigned IDs and the client table.
    pub fn reset(&mut self) {
        self.used.clear();
        self.clients.clear();
    }

    fn client_id_for(&mut self, uri: &str) -> RfcResult<u32> {
        if let Some(entry) = self.clients.iter().find(|c| c.uri == uri) {
            return Ok(entry.source_id);
        }

        let source_id = match self.clients.iter().map(|c| c.source_id).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or(CoreError::InvariantViolation("client IDs exhausted"))?,
            None => 1,
        };
        self.clients.push(ClientPidMap {
            source_id,
            uri: uri.to_string(),
        });
        Ok(source_id)
    }
}
