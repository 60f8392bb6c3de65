mod errors;
mod kind;
mod route;
mod source;
mod standardization;

pub use errors::DomainError;
pub use kind::{ChemicalKind, Role};
pub use route::{CompoundRef, RouteChain, RouteForest, RouteNode, PATH_SEPARATOR};
pub use source::SourceIdentity;
pub use standardization::{BuildingBlockPolicy, CompoundPatternMatcher, CompoundStandardizer, ReactionStandardizer,
                          StandardizedReaction};
