// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Process exit codes, compatible with BSD `sysexits.h`.

/// Successful termination.
pub const OK: i32 = 0;

/// Command line usage error.
pub const USAGE: i32 = 64;

/// Data format error.
pub const DATAERR: i32 = 65;

/// Cannot open input.
pub const NOINPUT: i32 = 66;

/// Service unavailable.
pub const UNAVAILABLE: i32 = 69;

/// Input/output error.
pub const IOERR: i32 = 74;

/// Temporary failure; the user is invited to retry.
pub const TEMPFAIL: i32 = 75;

/// Permission denied.
pub const NOPERM: i32 = 77;

/// Configuration error.
pub const CONFIG: i32 = 78;
