use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

/// Key for unlocking an existing config.
///
/// Order: `--key` / `CONFIG_KEY`, then one line of piped stdin, then a
/// TTY prompt.
pub fn read_key(given: Option<Zeroizing<String>>) -> Result<Zeroizing<String>> {
    //  CONFIG_KEY="supersecret" sup show
    if let Some(key) = given {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    //  echo "supersecret" | sup show
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    if io::stdin().is_terminal() {
        let key = Zeroizing::new(rpassword::prompt_password("Config key: ")?);
        if !key.is_empty() {
            return Ok(key);
        }
    }

    bail!("no config key provided (use --key, CONFIG_KEY or stdin)")
}

/// Key for sealing a config. Interactive and piped input must repeat it.
pub fn read_new_key_with_confirmation(
    given: Option<Zeroizing<String>>,
) -> Result<Zeroizing<String>> {
    if let Some(key) = given {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    let (k1, k2) = if io::stdin().is_terminal() {
        (
            Zeroizing::new(rpassword::prompt_password("New config key: ")?),
            Zeroizing::new(rpassword::prompt_password("Confirm config key: ")?),
        )
    } else {
        let stdin = io::stdin();
        let mut handle = stdin.lock();

        let mut k1 = Zeroizing::new(String::new());
        let mut k2 = Zeroizing::new(String::new());
        handle.read_line(&mut k1)?;
        handle.read_line(&mut k2)?;

        trim_newline(&mut k1);
        trim_newline(&mut k2);
        (k1, k2)
    };

    if k1.is_empty() {
        bail!("config key cannot be empty");
    }

    if k1 != k2 {
        bail!("config keys do not match");
    }

    Ok(k1)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
