use snafu::{Location, Snafu};

pub type CoreResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module(core_error), visibility(pub))]
pub enum Error {
    #[snafu(display("invalid input: {reason}"))]
    Validation {
        #[snafu(implicit)]
        location: Location,
        reason: String,
    },
    #[snafu(display("{entity} '{id}' does not exist"))]
    NotFound {
        #[snafu(implicit)]
        location: Location,
        entity: &'static str,
        id: String,
    },
    #[snafu(display("conflicting operation: {reason}"))]
    Conflict {
        #[snafu(implicit)]
        location: Location,
        reason: String,
    },
    #[snafu(display("upstream service '{service}' unavailable: {error_stringified}"))]
    UpstreamUnavailable {
        #[snafu(implicit)]
        location: Location,
        service: &'static str,
        error_stringified: String,
    },
    #[snafu(display("an unexpected error occurred: {error_stringified}"))]
    Unexpected {
        #[snafu(implicit)]
        location: Location,
        error_stringified: String,
    },
}
