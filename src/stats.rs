mod density;
mod engine;
mod normal;
mod validate;

pub use self::density::{DEFAULT_DISPLAY_HEIGHT, DENSITY_STEPS, sample_density, sample_result_density};
pub use self::engine::compute;
pub use self::normal::{NormalApprox, normal_cdf, normal_pdf};
pub use self::validate::{ValidTrial, validate};
