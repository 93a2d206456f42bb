use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::ViewerArgs;
use crate::error::AppResult;

pub(crate) fn parse_with_matches(argv: &[&str]) -> AppResult<(ViewerArgs, ArgMatches)> {
    let matches = ViewerArgs::command().try_get_matches_from(argv)?;
    let args = ViewerArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}
