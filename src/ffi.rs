//! FFI bindings for Hydro Pace
//!
//! This module provides C-compatible functions for calling Hydro Pace from
//! mobile and desktop hosts. All functions use C strings (null-terminated) and
//! return allocated memory that must be freed by the caller using
//! `hydro_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::pipeline::{
    monthly_grid_json, today_status_json, weekly_stats_json, zoned_instant, HydrationTracker,
};
use crate::types::DrinkType;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Turn a computation result into a C string, recording errors
fn result_to_cstr<E: std::fmt::Display>(result: Result<String, E>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Compute today's status and return it as JSON.
///
/// # Safety
/// - `entries_json` must be a valid null-terminated C string holding a JSON array.
/// - `settings_json` may be NULL (defaults apply) or a valid C string.
/// - Returns a newly allocated string that must be freed with `hydro_free_string`.
/// - Returns NULL on error; call `hydro_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hydro_today_status(
    entries_json: *const c_char,
    settings_json: *const c_char,
    now_ms: i64,
    utc_offset_minutes: i32,
) -> *mut c_char {
    clear_last_error();

    let entries = match cstr_to_string(entries_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid entries string pointer");
            return ptr::null_mut();
        }
    };
    let settings = cstr_to_string(settings_json);

    result_to_cstr(today_status_json(
        &entries,
        settings.as_deref(),
        now_ms,
        utc_offset_minutes,
    ))
}

/// Compute the seven-day summary and return it as JSON.
///
/// # Safety
/// - `entries_json` must be a valid null-terminated C string holding a JSON array.
/// - `settings_json` may be NULL (defaults apply) or a valid C string.
/// - Returns a newly allocated string that must be freed with `hydro_free_string`.
/// - Returns NULL on error; call `hydro_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hydro_weekly_stats(
    entries_json: *const c_char,
    settings_json: *const c_char,
    now_ms: i64,
    utc_offset_minutes: i32,
) -> *mut c_char {
    clear_last_error();

    let entries = match cstr_to_string(entries_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid entries string pointer");
            return ptr::null_mut();
        }
    };
    let settings = cstr_to_string(settings_json);

    result_to_cstr(weekly_stats_json(
        &entries,
        settings.as_deref(),
        now_ms,
        utc_offset_minutes,
    ))
}

/// Compute a monthly grid and return it as JSON.
///
/// # Safety
/// - `entries_json` must be a valid null-terminated C string holding a JSON array.
/// - `settings_json` may be NULL (defaults apply) or a valid C string.
/// - Returns a newly allocated string that must be freed with `hydro_free_string`.
/// - Returns NULL on error; call `hydro_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hydro_monthly_grid(
    entries_json: *const c_char,
    settings_json: *const c_char,
    year: i32,
    month: u32,
    utc_offset_minutes: i32,
) -> *mut c_char {
    clear_last_error();

    let entries = match cstr_to_string(entries_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid entries string pointer");
            return ptr::null_mut();
        }
    };
    let settings = cstr_to_string(settings_json);

    result_to_cstr(monthly_grid_json(
        &entries,
        settings.as_deref(),
        year,
        month,
        utc_offset_minutes,
    ))
}

// ============================================================================
// Stateful Tracker API
// ============================================================================

/// Opaque handle to a HydrationTracker
pub struct HydroTrackerHandle {
    tracker: HydrationTracker,
}

/// Create a new tracker with default settings and no entries.
///
/// # Safety
/// - Returns a pointer to a newly allocated tracker.
/// - Must be freed with `hydro_tracker_free`.
#[no_mangle]
pub unsafe extern "C" fn hydro_tracker_new() -> *mut HydroTrackerHandle {
    clear_last_error();

    let handle = Box::new(HydroTrackerHandle {
        tracker: HydrationTracker::new(),
    });
    Box::into_raw(handle)
}

/// Free a tracker.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `hydro_tracker_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn hydro_tracker_free(tracker: *mut HydroTrackerHandle) {
    if !tracker.is_null() {
        drop(Box::from_raw(tracker));
    }
}

/// Replace tracker settings from JSON.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `hydro_tracker_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, -1 on error; call `hydro_last_error` for details.
#[no_mangle]
pub unsafe extern "C" fn hydro_tracker_load_settings(
    tracker: *mut HydroTrackerHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return -1;
    }
    let handle = &mut *tracker;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.tracker.load_settings(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Append entries from a JSON array.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `hydro_tracker_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns the number of entries loaded, or -1 on error.
#[no_mangle]
pub unsafe extern "C" fn hydro_tracker_load_entries(
    tracker: *mut HydroTrackerHandle,
    json: *const c_char,
) -> i64 {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return -1;
    }
    let handle = &mut *tracker;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.tracker.load_entries(&json_str) {
        Ok(count) => count as i64,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Record an intake and return its new id.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `hydro_tracker_new`.
/// - `drink_type` may be NULL (water) or a valid C string.
/// - Returns a newly allocated string that must be freed with `hydro_free_string`.
/// - Returns NULL on error; call `hydro_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hydro_tracker_add(
    tracker: *mut HydroTrackerHandle,
    timestamp_ms: i64,
    amount_ml: f64,
    drink_type: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return ptr::null_mut();
    }
    let handle = &mut *tracker;

    if !amount_ml.is_finite() || amount_ml <= 0.0 {
        set_last_error("Amount must be positive");
        return ptr::null_mut();
    }

    let kind = match cstr_to_string(drink_type) {
        Some(s) => match s.parse::<DrinkType>() {
            Ok(kind) => kind,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        },
        None => DrinkType::Water,
    };

    let id = handle.tracker.add(timestamp_ms, amount_ml, kind);
    string_to_cstr(&id)
}

/// Remove an intake by id.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `hydro_tracker_new`.
/// - `id` must be a valid null-terminated C string.
/// - Returns 0 if removed, 1 if no such entry, -1 on error.
#[no_mangle]
pub unsafe extern "C" fn hydro_tracker_undo(
    tracker: *mut HydroTrackerHandle,
    id: *const c_char,
) -> i32 {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return -1;
    }
    let handle = &mut *tracker;

    let id_str = match cstr_to_string(id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid id string pointer");
            return -1;
        }
    };

    match handle.tracker.undo(&id_str) {
        Some(_) => 0,
        None => 1,
    }
}

/// Compute today's status for the tracker's entries.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `hydro_tracker_new`.
/// - Returns a newly allocated string that must be freed with `hydro_free_string`.
/// - Returns NULL on error; call `hydro_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hydro_tracker_status(
    tracker: *mut HydroTrackerHandle,
    now_ms: i64,
    utc_offset_minutes: i32,
) -> *mut c_char {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return ptr::null_mut();
    }
    let handle = &*tracker;

    let now = match zoned_instant(now_ms, utc_offset_minutes) {
        Ok(now) => now,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    result_to_cstr(
        handle
            .tracker
            .status(&now)
            .and_then(|status| serde_json::to_string(&status).map_err(Into::into)),
    )
}

/// Serialize the tracker's entries to a JSON array.
///
/// # Safety
/// - `tracker` must be a valid pointer returned by `hydro_tracker_new`.
/// - Returns a newly allocated string that must be freed with `hydro_free_string`.
/// - Returns NULL on error; call `hydro_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn hydro_tracker_save_entries(
    tracker: *mut HydroTrackerHandle,
) -> *mut c_char {
    clear_last_error();

    if tracker.is_null() {
        set_last_error("Null tracker pointer");
        return ptr::null_mut();
    }
    let handle = &*tracker;

    result_to_cstr(handle.tracker.save_entries())
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Hydro Pace functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Hydro Pace function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn hydro_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Hydro Pace call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn hydro_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn hydro_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
