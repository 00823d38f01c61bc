/*!
Command modules.

  src/cmd/
    mod.rs        (this file)
    category.rs   (Category enum + helpers)
    selection.rs  (--system filter -> Selection)
    dispatch.rs   (per-table retrieval + failure policy)
    render.rs     (text / JSON formatter sinks)
    format.rs     (terminal formatting primitives)
    show.rs       (ShowArgs + execute_show)

Conventions:
  - Each subcommand module exposes exactly one public `execute_*` function
    that returns `anyhow::Result<()>`.
  - Argument structs derive `clap::Args` and are kept minimal.
*/

pub mod category;
pub mod dispatch;
pub mod format;
pub mod render;
pub mod selection;
pub mod show;

pub use show::{ShowArgs, execute_show};
