//! Application layer: the entity-linkage orchestrator.
//!
//! `RemitDesk` sequences Order → Sender → Beneficiary → Documents for one
//! client session, awaiting each collaborator call in turn. It never
//! issues two mutating calls for the same order concurrently.

pub mod orchestrator;
