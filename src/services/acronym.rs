use rand::Rng;

/// Connector words that never contribute an initial.
const STOPWORDS: [&str; 6] = ["de", "da", "do", "das", "dos", "e"];

const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Upper-cased initials of every non-stopword token of `name`.
///
/// No uniqueness across institutions or courses: "Faculdade de Medicina" and
/// "Faculdade Mista" both yield "FM".
pub fn generate_acronym(name: &str) -> String {
    name.split_whitespace()
        .filter(|word| !STOPWORDS.contains(&word.to_lowercase().as_str()))
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Random `A-Z0-9` string used where the export has no identifier to offer.
/// Collisions are possible and not checked against the remote service.
pub fn random_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}
