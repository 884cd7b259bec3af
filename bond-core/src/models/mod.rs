mod brand;
mod field;
mod section;
mod template;

pub use brand::{BrandConfig, PlanOption, logo_data_url};
pub use field::{Field, FieldKind, FieldValue};
pub use section::Section;
pub use template::{TEMPLATE_CATEGORIES, Template, builtin_templates};
