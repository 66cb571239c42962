//! Address lookup pipeline shared by the HTTP handler and batch callers.
//!
//! For every identifier, in the order supplied:
//! 1. Build the Lv01 question
//! 2. Post it to the register
//! 3. Parse the answer into address records
//! 4. Turn the ages of alive residents into indicators
//!
//! Each step's failure becomes the result of that identifier only; the next
//! identifier is always processed.

use crate::age::current_age;
use crate::config::BrpConfig;
use crate::errors::{AppError, LookupError};
use crate::indicators::indicators;
use crate::models::{
    AddressRecord, Identifier, Location, LookupResult, ReceiverIdentity, SenderIdentity,
};
use crate::stuf_client::StufClient;
use crate::stuf_message::lv01_message;
use crate::stuf_parser::parse_answer;

/// Looks up a batch with a TLS session set up for this batch only.
///
/// If the session cannot be set up every identifier fails as a transport
/// error.
pub async fn lookup(identifiers: &[Identifier], config: &BrpConfig) -> Vec<LookupResult> {
    match BrpLookup::new(config).await {
        Ok(brp) => brp.lookup(identifiers).await,
        Err(e) => {
            tracing::error!("Failed to initialize BRP client: {}", e);
            identifiers
                .iter()
                .map(|id| LookupResult::failed(id.clone(), LookupError::Transport))
                .collect()
        }
    }
}

/// Runs lookups against one register with fixed sender/receiver identities.
#[derive(Clone)]
pub struct BrpLookup {
    client: StufClient,
    sender: SenderIdentity,
    receiver: ReceiverIdentity,
}

impl BrpLookup {
    /// Sets up the TLS session once for every lookup made through it.
    ///
    /// # Arguments
    ///
    /// * `config` - Register endpoint, certificates and identities.
    ///
    /// # Returns
    ///
    /// * `Result<Self, AppError>` - Fails when the certificate material cannot
    ///   be read or used.
    pub async fn new(config: &BrpConfig) -> Result<Self, AppError> {
        let client = StufClient::new(config).await?;
        Ok(Self::with_client(
            client,
            config.sender.clone(),
            config.receiver.clone(),
        ))
    }

    pub fn with_client(
        client: StufClient,
        sender: SenderIdentity,
        receiver: ReceiverIdentity,
    ) -> Self {
        Self {
            client,
            sender,
            receiver,
        }
    }

    /// Looks up every identifier, one at a time.
    ///
    /// # Arguments
    ///
    /// * `identifiers` - The locations to look up.
    ///
    /// # Returns
    ///
    /// * `Vec<LookupResult>` - Results in input order; one or more entries per
    ///   identifier. A failing identifier never affects the others.
    pub async fn lookup(&self, identifiers: &[Identifier]) -> Vec<LookupResult> {
        let mut results = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            results.extend(self.lookup_one(identifier).await);
        }
        results
    }

    /// Results for a single identifier, never empty.
    pub async fn lookup_one(&self, identifier: &Identifier) -> Vec<LookupResult> {
        tracing::info!("Looking up residents for location {}", identifier);

        let message = lv01_message(identifier, &self.sender, &self.receiver);
        let entries = match self.client.send(message).await {
            Ok(body) => parse_answer(identifier, &body),
            Err(e) => Err(e),
        };

        let entries = match entries {
            Ok(entries) => entries,
            Err(e) => {
                tracing::info!("Lookup for {} failed: {}", identifier, e);
                return vec![LookupResult::failed(identifier.clone(), e)];
            }
        };

        tracing::info!(
            "Found {} address(es) for location {}",
            entries.len(),
            identifier
        );

        entries
            .into_iter()
            .map(|entry| match entry {
                Ok(record) => assess(record),
                Err(e) => LookupResult::failed(identifier.clone(), e),
            })
            .collect()
    }
}

/// Indicators for one address record.
pub fn assess(record: AddressRecord) -> LookupResult {
    let ages: Vec<i32> = record
        .residents
        .iter()
        .filter(|person| person.is_alive())
        .filter_map(|person| person.birthdate)
        .map(current_age)
        .collect();

    LookupResult::found(
        Location::with_details(record.identifier, record.details),
        indicators(&ages),
    )
}
