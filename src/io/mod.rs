//! File output: STL serialization and the refinement parameters applied
//! before export.

pub mod stl;

pub use stl::{
    MeshingParams, to_stl_ascii, to_stl_ascii_multi, to_stl_binary, to_stl_binary_multi,
    write_stl_ascii, write_stl_binary, write_stl_binary_multi,
};
