use clap::Parser;

use crate::error::{AppError, AppResult};

use super::ViewerArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<ViewerArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    ViewerArgs::try_parse_from(args).map_err(AppError::from)
}
