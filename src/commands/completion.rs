use anyhow::Result;
use clap_complete::{Shell as CompleteShell, generate};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::cli::build_command;

/// Shells `wt completion` can generate scripts for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl FromStr for Shell {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            other => anyhow::bail!("unsupported shell: {} (supported: bash, zsh, fish)", other),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        };
        write!(f, "{}", name)
    }
}

// Worktree names are only known at runtime, so each script gets an overlay
// that asks `wt __complete` for them after `jump` and `remove`.
const BASH_OVERLAY: &str = r#"
_wt_with_worktrees() {
    local cur="${COMP_WORDS[COMP_CWORD]}"
    if [[ ${COMP_CWORD} -eq 2 && "${cur}" != -* ]]; then
        case "${COMP_WORDS[1]}" in
            jump|remove)
                COMPREPLY=($(compgen -W "$(wt __complete "${COMP_WORDS[1]}" 2>/dev/null)" -- "${cur}"))
                return 0
                ;;
        esac
    fi
    _wt "$@"
}

complete -F _wt_with_worktrees -o bashdefault -o default wt
"#;

const ZSH_OVERLAY: &str = r#"
_wt_with_worktrees() {
    if (( CURRENT == 3 )) && [[ $words[2] == (jump|remove) ]]; then
        local -a worktrees
        worktrees=(${(f)"$(wt __complete $words[2] 2>/dev/null)"})
        _describe -t worktrees 'worktrees' worktrees
        return
    fi
    _wt "$@"
}

(( $+functions[compdef] )) && compdef _wt_with_worktrees wt
"#;

const FISH_OVERLAY: &str = r#"
complete -c wt -n "__fish_seen_subcommand_from jump" -f -a "(wt __complete jump 2>/dev/null)"
complete -c wt -n "__fish_seen_subcommand_from remove" -f -a "(wt __complete remove 2>/dev/null)"
"#;

/// Writes the completion script for `shell` to `out`
///
/// # Errors
/// Returns an error if writing to `out` fails
pub fn generate_completion(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let (clap_shell, overlay) = match shell {
        Shell::Bash => (CompleteShell::Bash, BASH_OVERLAY),
        Shell::Zsh => (CompleteShell::Zsh, ZSH_OVERLAY),
        Shell::Fish => (CompleteShell::Fish, FISH_OVERLAY),
    };

    let mut cmd = build_command();
    generate(clap_shell, &mut cmd, "wt", out);
    out.write_all(overlay.as_bytes())?;
    Ok(())
}
