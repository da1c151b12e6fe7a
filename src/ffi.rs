//! Raw declarations for the parts of libLanlGeoMag that are called from Rust.
#![allow(non_snake_case)]

use crate::vector::Vector;
use std::os::raw::{c_double, c_int, c_long};

/// `Lgm_Vector`: three packed doubles, identical in layout to [`Vector`]
pub type Lgm_Vector = Vector;

/// Opaque `Lgm_CTrans`
#[repr(C)]
pub struct Lgm_CTrans {
    _private: [u8; 0],
}

/// Opaque `Lgm_MagModelInfo`. The struct opens with its `Lgm_CTrans *c` member, which is the only
/// field read from Rust.
#[repr(C)]
pub struct Lgm_MagModelInfo {
    pub c: *mut Lgm_CTrans,
    _private: [u8; 0],
}

/// External model code for OP77 in `Lgm_MagModelInfo.h`
pub const LGM_EXTMODEL_OP77: c_int = 8;

extern "C" {
    pub fn Lgm_InitMagInfo() -> *mut Lgm_MagModelInfo;
    pub fn Lgm_FreeMagInfo(m: *mut Lgm_MagModelInfo);
    pub fn Lgm_MagModelInfo_Set_MagModel(
        InternalModel: c_int,
        ExternalModel: c_int,
        m: *mut Lgm_MagModelInfo,
    );
    pub fn Lgm_Set_Coord_Transforms(Date: c_long, UTC: c_double, c: *mut Lgm_CTrans);
    pub fn Lgm_B_OP77(
        v: *mut Lgm_Vector,
        B: *mut Lgm_Vector,
        Info: *mut Lgm_MagModelInfo,
    ) -> c_int;
}
