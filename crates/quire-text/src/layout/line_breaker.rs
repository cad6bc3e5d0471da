/// Characters after which a row may wrap.
pub const WRAP_DELIMITERS: &[char] = &[' ', '.', ',', ':', ';', '!', '?', '\r', '\t'];

/// Default characters that bound a word for double-tap selection.
pub const WORD_DELIMITERS: &str = " .,:;!?'\"<>()[]{}";

/// Trailing characters that may hang past the wrap width.
const HANGING: &[char] = &[' ', '\t', '\r'];

/// A wrap unit: a run of non-delimiters and the delimiters following it,
/// or a lone `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Flat char offset of the first char.
    pub start: usize,
    /// Length in chars.
    pub len: usize,
}

impl<'a> Token<'a> {
    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }

    /// The part whose width must fit: trailing whitespace removed.
    pub fn fit_text(&self) -> &'a str {
        fit_text(self.text)
    }
}

/// `text` without trailing whitespace.
pub fn fit_text(text: &str) -> &str {
    text.trim_end_matches(HANGING)
}

/// Split `text` into wrap tokens.
///
/// A token starts at a non-delimiter that follows a delimiter. `\n` ends
/// the current token and is a token of its own. Leading delimiters form a
/// token by themselves.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start_byte = 0;
    let mut start_char = 0;
    let mut prev_delim = false;

    for (index, (byte, ch)) in text.char_indices().enumerate() {
        if ch == '\n' {
            if byte > start_byte {
                tokens.push(Token {
                    text: &text[start_byte..byte],
                    start: start_char,
                    len: index - start_char,
                });
            }
            tokens.push(Token {
                text: &text[byte..byte + 1],
                start: index,
                len: 1,
            });
            start_byte = byte + 1;
            start_char = index + 1;
            prev_delim = false;
            continue;
        }

        let delim = WRAP_DELIMITERS.contains(&ch);
        if !delim && prev_delim && byte > start_byte {
            tokens.push(Token {
                text: &text[start_byte..byte],
                start: start_char,
                len: index - start_char,
            });
            start_byte = byte;
            start_char = index;
        }
        prev_delim = delim;
    }

    if start_byte < text.len() {
        tokens.push(Token {
            text: &text[start_byte..],
            start: start_char,
            len: text[start_byte..].chars().count(),
        });
    }
    tokens
}

/// Column range of the word around `col` in `line`.
///
/// Scans left to just after the nearest delimiter before `col` and right to
/// the nearest delimiter at or after `col`, stopping at the line edges.
pub fn word_span(line: &str, col: usize, delimiters: &str) -> (usize, usize) {
    let chars: Vec<char> = line.chars().collect();
    let col = col.min(chars.len());
    let is_delim = |c: &char| delimiters.contains(*c);

    let start = chars[..col]
        .iter()
        .rposition(is_delim)
        .map_or(0, |pos| pos + 1);
    let end = chars[col..]
        .iter()
        .position(is_delim)
        .map_or(chars.len(), |pos| col + pos);
    (start, end)
}

/// Flat offset of the start of the word before `index`.
///
/// Words are runs of non-whitespace; `\n` is whitespace, so the scan
/// crosses rows.
pub fn prev_word_start(text: &str, index: usize) -> usize {
    let mut chars = text.chars().take(index).collect::<Vec<_>>();
    while chars.last().is_some_and(|c| c.is_whitespace()) {
        chars.pop();
    }
    while chars.last().is_some_and(|c| !c.is_whitespace()) {
        chars.pop();
    }
    chars.len()
}

/// Flat offset of the start of the word after `index`, or the text end.
pub fn next_word_start(text: &str, index: usize) -> usize {
    let mut pos = index;
    let mut chars = text.chars().skip(index).peekable();
    while chars.next_if(|c| !c.is_whitespace()).is_some() {
        pos += 1;
    }
    while chars.next_if(|c| c.is_whitespace()).is_some() {
        pos += 1;
    }
    pos
}
