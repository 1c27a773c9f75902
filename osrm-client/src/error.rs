use reqwest::StatusCode;
use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module(osrm_error), visibility(pub))]
pub enum Error {
    #[snafu(display("HTTP request error"))]
    Request {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
    #[snafu(display("HTTP request failed, status: '{status}', url: '{url}', body: '{body}'"))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("routing failed with code '{code}'"))]
    FailedRouting {
        #[snafu(implicit)]
        location: Location,
        code: String,
    },
    #[snafu(display("routing response contained no routes"))]
    EmptyResponse {
        #[snafu(implicit)]
        location: Location,
    },
}
