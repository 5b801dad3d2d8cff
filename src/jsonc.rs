//! JSON-with-comments support for the config file.
//!
//! `to_json` blanks out `//` and `/* */` comments and trailing commas with
//! spaces, so the result has the same length as the input and serde_json
//! error positions still point at the right line and column.

pub fn to_json(input: &[u8]) -> Vec<u8> {
    let mut out = input.to_vec();
    let mut i = 0;
    // position of the last comma outside a string, not yet followed by a value
    let mut pending_comma: Option<usize> = None;

    while i < out.len() {
        match out[i] {
            b'"' => {
                pending_comma = None;
                i += 1;
                while i < out.len() {
                    match out[i] {
                        b'\\' => i += 2,
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
                continue;
            }
            b'/' if out.get(i + 1) == Some(&b'/') => {
                while i < out.len() && out[i] != b'\n' {
                    out[i] = b' ';
                    i += 1;
                }
                continue;
            }
            b'/' if out.get(i + 1) == Some(&b'*') => {
                out[i] = b' ';
                out[i + 1] = b' ';
                i += 2;
                while i < out.len() {
                    if out[i] == b'*' && out.get(i + 1) == Some(&b'/') {
                        out[i] = b' ';
                        out[i + 1] = b' ';
                        i += 2;
                        break;
                    }
                    // keep line breaks so line numbers survive
                    if out[i] != b'\n' && out[i] != b'\r' {
                        out[i] = b' ';
                    }
                    i += 1;
                }
                continue;
            }
            b',' => pending_comma = Some(i),
            b']' | b'}' => {
                if let Some(pos) = pending_comma.take() {
                    out[pos] = b' ';
                }
            }
            b' ' | b'\t' | b'\n' | b'\r' => {}
            _ => pending_comma = None,
        }
        i += 1;
    }

    out
}
