// Text measurement and page geometry for the CV template.
// Everything here is pure and CPU-bound; callers run it inside spawn_blocking.

pub mod font_metrics;
pub mod page;
pub mod wrap;

pub use font_metrics::{get_metrics, FontFace};
pub use page::{a4_two_column, PageGeometry};
pub use wrap::wrap_text;
