// Identity Registry Service
//
// This crate implements a small REST backend for collecting and verifying
// identity records (Aadhaar and PAN numbers) with a simulated OTP-based
// verification flow. OTP delivery is simulated: the generated code is
// returned in the HTTP response rather than sent over SMS or email.
//
// # Architecture
//
// The service is built around a few modular components:
//
// * **Validation**: pure Aadhaar (Verhoeff checksum) and PAN format checks
// * **OTP Store**: ephemeral, single-use one-time codes with lazy expiry
// * **Record Store**: pluggable persistence (in-memory or SQLite) with
//   uniqueness constraints on Aadhaar and PAN numbers
// * **Verification Service**: orchestrates the Aadhaar-then-PAN flows and
//   performs the single persistence step at the end of the PAN flow
// * **API Layer**: Axum REST interface translating service results into
//   JSON responses and HTTP status codes
//
// # Limitations
//
// OTP state is process-local and in-memory. Running more than one instance
// of this service behind a load balancer breaks OTP verification, since a
// code generated on one instance is unknown to the others.

/// HTTP API implementation: router, server and request handlers.
pub mod api;

/// Configuration loading from TOML files and environment variables.
pub mod config;

/// Error types shared across the service.
pub mod error;

/// Ephemeral one-time password store with injected clock and TTL.
pub mod otp;

/// The Aadhaar/PAN verification state machine.
pub mod service;

/// Record persistence backends behind the `RecordStore` trait.
pub mod storage;

/// Identity record and request/response types.
pub mod types;

/// Pure Aadhaar and PAN validators.
pub mod validation;
