//! Generates the "mana item" ornament: a sphere pierced by a tube swept
//! along a hypotrochoid, carved with **Constructive Solid Geometry (CSG)**
//! Boolean operations on sets of polygons stored in [BSP](bsp) trees, and
//! exported as STL together with a JSON project document.
//!
//! The high-level entry points live in [`pipeline`]:
//! - [`pipeline::generate`] builds the pierced sphere from [`pipeline::OrnamentParams`]
//! - [`pipeline::export`] additionally writes coarse and fine STLs and the
//!   project document to a directory
//!
//! The lower layers are usable on their own: [`curve`] samples the path,
//! [`sketch`] holds 2D profiles, [`extrudes`] sweeps them into tubes,
//! [`mesh`] does the Boolean work, and [`io`] serializes the result.

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod bsp;
pub mod curve;
pub mod document;
pub mod errors;
pub mod extrudes;
pub mod float_types;
pub mod frame;
pub mod io;
pub mod manifold;
pub mod mesh;
pub mod pipeline;
pub mod plane;
pub mod polygon;
pub mod shapes3d;
pub mod sketch;
pub mod triangulated;
pub mod vertex;

pub use mesh::Mesh;
pub use sketch::Sketch;
pub use vertex::Vertex;
