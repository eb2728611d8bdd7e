//! Help output styling.

use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Help theme: cyan headers, green literals, yellow placeholders.
pub fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Cyan.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

/// Quick start, environment and paths, shown after `--help`.
pub const AFTER_HELP: &str = color_print::cstr!(
    r#"<cyan,bold>QUICK START</>
    <green,bold>vanna login --email</> <dim>you@example.com --save</>
    <green,bold>vanna models create</> <dim>my-db --db-type Postgres</>
    <green,bold>vanna train -m</> <dim>my-db --ddl "CREATE TABLE ..."</>
    <green,bold>vanna ask -m</> <dim>my-db "Who are the top 10 customers?" --postgres</>

<cyan,bold>ENVIRONMENT VARIABLES</>
    <yellow>VANNA_HOME</>           Override config directory (default: ~/.vanna)
    <yellow>VANNA_ENDPOINT</>       Service base URL (alternative to --endpoint)
    <yellow>VANNA_API_KEY</>        API key (alternative to --api-key)
    <yellow>VANNA_MODEL</>          Default model (alternative to --model)
    <yellow>VANNA_LOG_LEVEL</>      Log verbosity (error, warn, info, debug, trace)
    <yellow>HOST</>, <yellow>DATABASE</>, <yellow>PG_USER</>, <yellow>PASSWORD</>, <yellow>PORT</>
                         Postgres connection for `ask --postgres`
    <yellow>NO_COLOR</>             Disable colored output

<cyan,bold>PATHS</>
    <dim>Config</>      ~/.vanna/config.toml"#
);
