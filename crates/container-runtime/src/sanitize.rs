//! Quoting for the user command and for individual flag values.
//!
//! The compiled line is handed to a host shell (`sh -c` or `powershell`), so a
//! literal double quote has to survive that shell: `\"` for POSIX shells,
//! `` `" `` for PowerShell. Commands that already carry the other flavour of
//! escaping are passed through as-is.

use crate::platform::HostPlatform;
use crate::spec::Shell;

/// Wrap `inner` in the in-container shell and render it as one string.
pub fn wrap(shell: Shell, inner: &str, platform: &HostPlatform) -> String {
    wrap_tokens(shell, inner, platform).join(" ")
}

/// Same as [`wrap`], split into the tokens the compiler appends after the image.
pub fn wrap_tokens(shell: Shell, inner: &str, platform: &HostPlatform) -> Vec<String> {
    match shell {
        Shell::None if inner.is_empty() => Vec::new(),
        Shell::None => vec![inner.to_string()],
        Shell::Powershell => vec!["powershell".to_string(), inner.to_string()],
        Shell::Sh | Shell::Bash => {
            let mut tokens = vec![r#""/usr/bin/env""#.to_string()];
            if shell == Shell::Bash {
                tokens.push(r#""bash""#.to_string());
                tokens.push(r#""-l""#.to_string());
            } else {
                tokens.push(r#""sh""#.to_string());
            }
            tokens.push(r#""-c""#.to_string());
            tokens.push(format!("\"{}\"", escape_quotes(inner, platform)));
            tokens
        }
    }
}

/// Escape every literal `"` for the host shell that will run the compiled line.
pub fn escape_quotes(text: &str, platform: &HostPlatform) -> String {
    if platform.is_windows() {
        text.replace('"', "`\"")
    } else {
        text.replace('"', "\\\"")
    }
}

/// Quote each CLI argument and join them into the `command` of a run spec.
pub fn escape_args<S: AsRef<str>>(args: &[S], platform: &HostPlatform) -> String {
    args.iter()
        .map(|arg| {
            let trimmed = arg.as_ref().trim_matches('"');
            format!("\"{}\"", escape_quotes(trimmed, platform))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Double-quoted flag value that the host shell hands to the runtime verbatim.
///
/// Inside double quotes POSIX shells still expand `\`, `"`, `$` and backticks,
/// PowerShell expands `"`, `$` and backticks. Everything else, control
/// characters included, is literal.
pub fn quote(value: &str, platform: &HostPlatform) -> String {
    let escape = if platform.is_windows() { '`' } else { '\\' };
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        let special = match ch {
            '"' | '$' | '`' => true,
            '\\' => !platform.is_windows(),
            _ => false,
        };
        if special {
            out.push(escape);
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HostOs;

    fn linux() -> HostPlatform {
        HostPlatform::new(HostOs::Linux)
    }

    fn windows() -> HostPlatform {
        HostPlatform::new(HostOs::Windows)
    }

    #[test]
    fn none_returns_command_unchanged() {
        assert_eq!(wrap(Shell::None, "make -j4", &linux()), "make -j4");
        assert!(wrap_tokens(Shell::None, "", &linux()).is_empty());
    }

    #[test]
    fn powershell_prefix() {
        assert_eq!(
            wrap(Shell::Powershell, "command string", &windows()),
            "powershell command string"
        );
    }

    #[test]
    fn sh_wrapping() {
        assert_eq!(
            wrap(Shell::Sh, "command string", &linux()),
            r#""/usr/bin/env" "sh" "-c" "command string""#
        );
    }

    #[test]
    fn bash_is_a_login_shell() {
        assert_eq!(
            wrap(Shell::Bash, "command string", &linux()),
            r#""/usr/bin/env" "bash" "-l" "-c" "command string""#
        );
    }

    #[test]
    fn quotes_are_escaped_per_platform() {
        assert_eq!(
            wrap(Shell::Sh, r#"echo "hi""#, &linux()),
            r#""/usr/bin/env" "sh" "-c" "echo \"hi\"""#
        );
        assert_eq!(
            wrap(Shell::Bash, r#"echo "hi""#, &windows()),
            r#""/usr/bin/env" "bash" "-l" "-c" "echo `"hi`"""#
        );
    }

    #[test]
    fn escape_args_trims_and_quotes() {
        let args = ["npm", "run", "\"build\"", r#"--msg=say "x" now"#];
        assert_eq!(
            escape_args(&args, &linux()),
            r#""npm" "run" "build" "--msg=say \"x\" now""#
        );
        assert_eq!(
            escape_args(&args, &windows()),
            r#""npm" "run" "build" "--msg=say `"x`" now""#
        );
    }

    #[test]
    fn quote_escapes_host_shell_metacharacters() {
        assert_eq!(quote("true", &linux()), r#""true""#);
        assert_eq!(quote(r#"a "b" c\d"#, &linux()), r#""a \"b\" c\\d""#);
        assert_eq!(quote("pa$word `id`", &linux()), r#""pa\$word \`id\`""#);
        assert_eq!(quote("line\nnext", &linux()), "\"line\nnext\"");
        assert_eq!(
            quote(r#"C:\tmp "x" $env:HOME `n"#, &windows()),
            r#""C:\tmp `"x`" `$env:HOME ``n""#
        );
    }

    #[cfg(unix)]
    #[test]
    fn quoted_values_reach_the_program_unchanged() {
        let value = "pa$word $(id) `echo injected` \\ \"q\"\nline2\t\x07";
        let line = format!("printf '<%s>' {}", quote(value, &linux()));
        assert_eq!(run_through_host_shell(&line), format!("<{}>", value));
    }

    #[cfg(unix)]
    fn run_through_host_shell(line: &str) -> String {
        let output = std::process::Command::new("/usr/bin/env")
            .args(["sh", "-c", line])
            .output()
            .unwrap();
        assert!(output.status.success(), "shell failed for {line}");
        String::from_utf8(output.stdout).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn wrapped_command_keeps_argument_boundaries() {
        let wrapped = wrap(Shell::Sh, "printf '<%s>' one 'two three' four", &linux());
        assert_eq!(run_through_host_shell(&wrapped), "<one><two three><four>");
    }

    #[cfg(unix)]
    #[test]
    fn escaped_args_survive_both_shells() {
        let inner = escape_args(&["printf", "<%s>", "a b", "c"], &linux());
        let wrapped = wrap(Shell::Sh, &inner, &linux());
        assert_eq!(run_through_host_shell(&wrapped), "<a b><c>");
    }
}
