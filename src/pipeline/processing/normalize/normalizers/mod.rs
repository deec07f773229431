// One normalizer per listing column

pub mod headquarters;
pub mod location;
pub mod name;
pub mod revenue;
pub mod salary;
pub mod size;

pub use headquarters::HeadquartersNormalizer;
pub use location::LocationNormalizer;
pub use name::NameNormalizer;
pub use revenue::RevenueNormalizer;
pub use salary::SalaryNormalizer;
pub use size::SizeNormalizer;
