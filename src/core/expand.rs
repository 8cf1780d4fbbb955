pub const PID_MARKER: &str = "$$";

/// Replace every `$$` in `word` with `pid`, scanning left to right.
///
/// Scanning resumes after the inserted text, so `$$$$` becomes the pid twice
/// and `$$$` becomes the pid followed by a single `$`.
pub fn substitute_pid(word: &str, pid: &str) -> String {
    let mut result = word.to_string();
    let mut cursor = 0;

    while let Some(offset) = result[cursor..].find(PID_MARKER) {
        let start = cursor + offset;
        result.replace_range(start..start + PID_MARKER.len(), pid);
        cursor = start + pid.len();
    }

    result
}

pub fn substitute_all(words: &mut [String], pid: u32) {
    let pid = pid.to_string();
    for word in words.iter_mut().filter(|w| w.contains(PID_MARKER)) {
        *word = substitute_pid(word, &pid);
    }
}
