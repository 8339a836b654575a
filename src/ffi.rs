//! C FFI bindings for the moment analyzer.
//!
//! - **`#[repr(C)]`** result structs filled through out-pointers
//! - **Integer error codes**: 0 = success, negative = error
//! - **Thread-local error message**: `eda_last_error()`
//! - **`catch_unwind`** around every entry point
//!
//! # Safety
//!
//! Null pointer arguments return [`EDA_ERR_NULL_PTR`].

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic;
use std::ptr;
use std::slice;

use crate::csv_loader::CsvLoader;
use crate::error::EdaError;
use crate::moments::{analyze, moments_of, Moments};
use crate::shape::{classify, KurtosisLabel, SkewLabel, ThresholdPolicy};

pub const EDA_OK: i32 = 0;
pub const EDA_ERR_NULL_PTR: i32 = -1;
pub const EDA_ERR_INVALID_INPUT: i32 = -2;
pub const EDA_ERR_PARSE_FAILED: i32 = -3;
pub const EDA_ERR_ANALYSIS_FAILED: i32 = -4;
pub const EDA_ERR_PANIC: i32 = -99;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = CString::new(msg).ok();
    });
}

fn error_code(e: &EdaError) -> i32 {
    set_last_error(&e.to_string());
    match e {
        EdaError::CsvParse { .. } | EdaError::Io(_) => EDA_ERR_PARSE_FAILED,
        EdaError::InvalidInput { .. } | EdaError::MissingColumn { .. } => EDA_ERR_INVALID_INPUT,
        _ => EDA_ERR_ANALYSIS_FAILED,
    }
}

/// Returns the last error message, or null if none.
/// The string stays valid until the next FFI call on this thread.
///
/// # Safety
/// The caller must not free the returned pointer.
#[no_mangle]
pub extern "C" fn eda_last_error() -> *const c_char {
    LAST_ERROR.with(|cell| match cell.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

#[no_mangle]
pub extern "C" fn eda_clear_error() {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Static version string. Do not free.
#[no_mangle]
pub extern "C" fn eda_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr().cast()
}

// ── Moments ──────────────────────────────────────────────────────────

/// C-compatible moments. Skewness and kurtosis are NaN for constant input.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CMoments {
    pub n: u64,
    pub mean: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
}

impl From<Moments> for CMoments {
    fn from(m: Moments) -> Self {
        Self {
            n: m.n as u64,
            mean: m.mean,
            std_dev: m.std_dev,
            skewness: m.skewness,
            excess_kurtosis: m.excess_kurtosis,
        }
    }
}

/// Computes moments of `n` contiguous f64 values.
///
/// # Safety
/// `data` must point to `n` f64s. `out` must be valid.
#[no_mangle]
pub unsafe extern "C" fn eda_moments(data: *const f64, n: u32, out: *mut CMoments) -> i32 {
    let result = panic::catch_unwind(|| {
        if data.is_null() || out.is_null() {
            set_last_error("null pointer");
            return EDA_ERR_NULL_PTR;
        }
        let values = unsafe { slice::from_raw_parts(data, n as usize) };
        match moments_of("data", values) {
            Ok(m) => {
                unsafe { *out = m.into() };
                EDA_OK
            }
            Err(e) => error_code(&e),
        }
    });
    result.unwrap_or_else(|_| {
        set_last_error("panic in eda_moments");
        EDA_ERR_PANIC
    })
}

/// Parses CSV text and computes moments of `column`.
///
/// # Safety
/// `csv_data` and `column` must be valid null-terminated UTF-8 strings.
/// `out` must be valid.
#[no_mangle]
pub unsafe extern "C" fn eda_analyze_csv(
    csv_data: *const c_char,
    column: *const c_char,
    out: *mut CMoments,
) -> i32 {
    let result = panic::catch_unwind(|| {
        if csv_data.is_null() || column.is_null() || out.is_null() {
            set_last_error("null pointer");
            return EDA_ERR_NULL_PTR;
        }
        let (csv, column) = match (
            unsafe { CStr::from_ptr(csv_data) }.to_str(),
            unsafe { CStr::from_ptr(column) }.to_str(),
        ) {
            (Ok(csv), Ok(column)) => (csv, column),
            (Err(e), _) | (_, Err(e)) => {
                set_last_error(&format!("invalid UTF-8: {e}"));
                return EDA_ERR_INVALID_INPUT;
            }
        };

        let mut df = match CsvLoader::new().load_str(csv) {
            Ok(df) => df,
            Err(e) => return error_code(&e),
        };
        df.drop_missing_rows();
        match analyze(&df, column) {
            Ok(m) => {
                unsafe { *out = m.into() };
                EDA_OK
            }
            Err(e) => error_code(&e),
        }
    });
    result.unwrap_or_else(|_| {
        set_last_error("panic in eda_analyze_csv");
        EDA_ERR_PANIC
    })
}

// ── Shape ────────────────────────────────────────────────────────────

/// Policy code for [`eda_classify`]: ±0.5 neutral band.
pub const EDA_POLICY_SYMMETRIC_BAND: u32 = 0;
/// Policy code for [`eda_classify`]: sign only.
pub const EDA_POLICY_SIGN: u32 = 1;

/// C-compatible shape labels.
///
/// `skew`: 0=not skewed, 1=symmetrical, 2=right-skewed, 3=left-skewed, 4=undefined.
/// `kurtosis`: 0=mesokurtic, 1=leptokurtic, 2=platykurtic, 3=undefined.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CShape {
    pub skew: u32,
    pub kurtosis: u32,
}

/// Classifies a skewness / excess kurtosis pair.
///
/// # Safety
/// `out` must be valid.
#[no_mangle]
pub unsafe extern "C" fn eda_classify(
    skewness: f64,
    excess_kurtosis: f64,
    policy: u32,
    out: *mut CShape,
) -> i32 {
    let result = panic::catch_unwind(|| {
        if out.is_null() {
            set_last_error("null pointer");
            return EDA_ERR_NULL_PTR;
        }
        let policy = match policy {
            EDA_POLICY_SYMMETRIC_BAND => ThresholdPolicy::SymmetricBand,
            EDA_POLICY_SIGN => ThresholdPolicy::Sign,
            other => {
                set_last_error(&format!("unknown policy code {other}"));
                return EDA_ERR_INVALID_INPUT;
            }
        };
        let shape = classify(skewness, excess_kurtosis, policy);
        let skew = match shape.skew {
            SkewLabel::NotSkewed => 0,
            SkewLabel::Symmetrical => 1,
            SkewLabel::RightSkewed => 2,
            SkewLabel::LeftSkewed => 3,
            SkewLabel::Undefined => 4,
        };
        let kurtosis = match shape.kurtosis {
            KurtosisLabel::Mesokurtic => 0,
            KurtosisLabel::Leptokurtic => 1,
            KurtosisLabel::Platykurtic => 2,
            KurtosisLabel::Undefined => 3,
        };
        unsafe { *out = CShape { skew, kurtosis } };
        EDA_OK
    });
    result.unwrap_or_else(|_| {
        set_last_error("panic in eda_classify");
        EDA_ERR_PANIC
    })
}
