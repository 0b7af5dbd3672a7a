//! Upload file naming
//!
//! Client supplied file names are never trusted as paths. They are reduced to
//! a safe ASCII name and prefixed with a random token before being written.

use unicode_normalization::UnicodeNormalization;

use crate::crypto::random_hex;

/// Length of the random prefix added to stored file names
pub const STORED_NAME_PREFIX_LEN: usize = 12;

/// Longest stem kept from a client file name
pub const MAX_STEM_LEN: usize = 100;

/// Longest extension kept from a client file name
pub const MAX_EXT_LEN: usize = 10;

/// Reduce a client file name to `[A-Za-z0-9_.-]`
///
/// Path separators become spaces, runs of whitespace become a single `_`,
/// runs of dots become a single `.`, and leading/trailing dots and
/// underscores are stripped. The result may be empty.
///
/// ```rust
/// use platform::upload::secure_filename;
///
/// assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
/// assert_eq!(secure_filename("My Logo.png"), "My_Logo.png");
/// ```
pub fn secure_filename(file_name: &str) -> String {
    let folded: String = file_name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = folded.split_whitespace().collect::<Vec<_>>().join("_");

    let mut kept = String::with_capacity(joined.len());
    for c in joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        if c == '.' && kept.ends_with('.') {
            continue;
        }
        kept.push(c);
    }

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Stored name for an upload: `<random hex>_<sanitised name>`
///
/// The stem is cut to [`MAX_STEM_LEN`] and the extension to [`MAX_EXT_LEN`]
/// characters. `fallback_ext` is used when sanitising leaves nothing usable.
pub fn stored_file_name(original: &str, fallback_ext: &str) -> String {
    let prefix = random_hex(STORED_NAME_PREFIX_LEN);
    let safe = secure_filename(original);

    let Some((stem, ext)) = safe.rsplit_once('.') else {
        return format!("{}_upload.{}", prefix, fallback_ext);
    };

    let stem = truncate(stem, MAX_STEM_LEN);
    let stem = stem.trim_end_matches(['.', '_']);
    let stem = if stem.is_empty() { "upload" } else { stem };
    let ext = truncate(ext, MAX_EXT_LEN);

    format!("{}_{}.{}", prefix, stem, ext)
}

fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Whether `reference` names a single file directly inside the upload root
pub fn is_plain_file_name(reference: &str) -> bool {
    !reference.is_empty()
        && reference != "."
        && reference != ".."
        && !reference.contains(['/', '\\', '\0'])
        && !reference.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename_strips_paths() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\logo.png"), "C_Users_me_logo.png");
        assert_eq!(secure_filename("/abs/path.jpg"), "abs_path.jpg");
    }

    #[test]
    fn test_secure_filename_collapses_dot_runs() {
        assert_eq!(secure_filename("logo..png"), "logo.png");
        assert_eq!(secure_filename("a...b....jpg"), "a.b.jpg");
        assert_eq!(secure_filename("team . . png"), "team_._._png");
    }

    #[test]
    fn test_stored_file_name_bounds_length() {
        let long = format!("{}.png", "a".repeat(300));
        let name = stored_file_name(&long, "png");
        assert!(name.ends_with(".png"));
        assert_eq!(
            name.len(),
            STORED_NAME_PREFIX_LEN + 1 + MAX_STEM_LEN + ".png".len()
        );
        assert!(is_plain_file_name(&name));

        let long_ext = format!("x.{}", "p".repeat(40));
        let name = stored_file_name(&long_ext, "png");
        assert!(name.ends_with(&format!("_x.{}", "p".repeat(MAX_EXT_LEN))));
    }

    #[test]
    fn test_stored_file_name_keeps_plain_after_cut() {
        // Cut lands right before a dot
        let original = format!("{}.x.png", "b".repeat(MAX_STEM_LEN - 1));
        let name = stored_file_name(&original, "png");
        assert!(is_plain_file_name(&name));
        assert!(name.ends_with(".png"));

        let name = stored_file_name("logo..png", "png");
        assert!(name.ends_with("_logo.png"));
        assert!(is_plain_file_name(&name));
    }

    #[test]
    fn test_secure_filename_folds_unicode() {
        assert_eq!(secure_filename("Drużyna Młodzików.jpg"), "Druzyna_Modzikow.jpg");
        assert_eq!(secure_filename("   "), "");
        assert_eq!(secure_filename("..."), "");
    }

    #[test]
    fn test_secure_filename_drops_unsafe_characters() {
        assert_eq!(secure_filename("logo<script>.png"), "logoscript.png");
        assert_eq!(secure_filename("a;b|c.png"), "abc.png");
    }

    #[test]
    fn test_stored_file_name_is_unique() {
        let a = stored_file_name("logo.png", "png");
        let b = stored_file_name("logo.png", "png");
        assert_ne!(a, b);
        assert!(a.ends_with("_logo.png"));
        assert_eq!(a.len(), STORED_NAME_PREFIX_LEN + "_logo.png".len());
    }

    #[test]
    fn test_stored_file_name_fallback() {
        let name = stored_file_name("źółć", "jpg");
        assert!(name.ends_with("_upload.jpg"));
        assert!(is_plain_file_name(&name));
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("0a1b2c3d4e5f_logo.png"));
        assert!(!is_plain_file_name("../logo.png"));
        assert!(!is_plain_file_name("dir/logo.png"));
        assert!(!is_plain_file_name("dir\\logo.png"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
    }
}
