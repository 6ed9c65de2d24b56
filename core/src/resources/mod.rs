//! The portal's backend collections.
//!
//! Each module declares the record shapes, the `Resource` static with its
//! path, parameter naming and sort allow-list, and the validation schemas
//! for its forms.

pub mod berita;
pub mod buku_tamu;
pub mod dokumen;
pub mod hari_libur;
pub mod jenis_usaha;
pub mod kios;
pub mod pasar;
pub mod pegawai;
pub mod pwa_version;
pub mod radio;
pub mod survei;
pub mod video;
