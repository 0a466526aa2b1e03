use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use ndarray::{Array1, Array2};
use regex::Regex;

use super::error::ClassifierError;
use super::utils::normalize_vector;

lazy_static! {
    /// Tokens are runs of two or more word characters.
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").unwrap();

    static ref ENGLISH_STOP_WORDS: HashSet<&'static str> = [
        "a", "about", "above", "across", "after", "afterwards", "again", "against",
        "all", "almost", "alone", "along", "already", "also", "although", "always",
        "am", "among", "amongst", "amoungst", "amount", "an", "and", "another",
        "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
        "around", "as", "at", "back", "be", "became", "because", "become",
        "becomes", "becoming", "been", "before", "beforehand", "behind", "being",
        "below", "beside", "besides", "between", "beyond", "bill", "both",
        "bottom", "but", "by", "call", "can", "cannot", "cant", "co", "con",
        "could", "couldnt", "cry", "de", "describe", "detail", "do", "done",
        "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
        "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone",
        "everything", "everywhere", "except", "few", "fifteen", "fifty", "fill",
        "find", "fire", "first", "five", "for", "former", "formerly", "forty",
        "found", "four", "from", "front", "full", "further", "get", "give", "go",
        "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter",
        "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
        "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed",
        "interest", "into", "is", "it", "its", "itself", "keep", "last", "latter",
        "latterly", "least", "less", "ltd", "made", "many", "may", "me",
        "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
        "move", "much", "must", "my", "myself", "name", "namely", "neither",
        "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone",
        "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on",
        "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our",
        "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps",
        "please", "put", "rather", "re", "same", "see", "seem", "seemed",
        "seeming", "seems", "serious", "several", "she", "should", "show", "side",
        "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone",
        "something", "sometime", "sometimes", "somewhere", "still", "such",
        "system", "take", "ten", "than", "that", "the", "their", "them",
        "themselves", "then", "thence", "there", "thereafter", "thereby",
        "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
        "third", "this", "those", "though", "three", "through", "throughout",
        "thru", "thus", "to", "together", "too", "top", "toward", "towards",
        "twelve", "twenty", "two", "un", "under", "until", "up", "upon", "us",
        "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
        "whence", "whenever", "where", "whereafter", "whereas", "whereby",
        "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
        "who", "whoever", "whole", "whom", "whose", "why", "will", "with",
        "within", "without", "would", "yet", "you", "your", "yours", "yourself",
        "yourselves",
    ]
    .into_iter()
    .collect();
}

/// Returns true if `word` (already lower-cased) is an English stop word.
pub fn is_stop_word(word: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(word)
}

/// Term-frequency / inverse-document-frequency vectorizer over word n-grams.
///
/// Text is lower-cased, split into tokens of at least two word characters,
/// stripped of English stop words and expanded into n-grams. Terms that were
/// not seen during [`TfidfVectorizer::fit`] are ignored by
/// [`TfidfVectorizer::transform`], so unfamiliar text maps to the zero vector.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize, ngram_range: (usize, usize)) -> Self {
        Self {
            max_features,
            ngram_range,
            vocabulary: HashMap::new(),
            idf: Array1::zeros(0),
        }
    }

    /// Splits `text` into the terms used as features, in order of appearance.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !is_stop_word(token))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 0 || n > tokens.len() {
                continue;
            }
            terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
        }
        terms
    }

    /// Learns the vocabulary and IDF weights from `texts`.
    pub fn fit<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<(), ClassifierError> {
        if texts.is_empty() {
            return Err(ClassifierError::ConfigurationError(
                "Cannot fit vectorizer on an empty corpus".into(),
            ));
        }

        // term -> (total count, document frequency)
        let mut stats: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for text in texts {
            let mut seen = HashSet::new();
            for term in self.analyze(text.as_ref()) {
                let entry = stats.entry(term.clone()).or_insert((0, 0));
                entry.0 += 1;
                if seen.insert(term) {
                    entry.1 += 1;
                }
            }
        }

        if stats.is_empty() {
            return Err(ClassifierError::ConfigurationError(
                "Corpus yields an empty vocabulary; every example consists of stop words".into(),
            ));
        }

        let mut terms: Vec<(String, (usize, usize))> = stats.into_iter().collect();
        if terms.len() > self.max_features {
            // Most frequent first, lexicographic among equals.
            terms.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then_with(|| a.0.cmp(&b.0)));
            terms.truncate(self.max_features);
            terms.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let n_docs = texts.len() as f64;
        self.idf = terms
            .iter()
            .map(|(_, (_, df))| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(index, (term, _))| (term, index))
            .collect();
        Ok(())
    }

    /// Maps `text` to an L2-normalized TF-IDF vector of length [`vocabulary_size`].
    ///
    /// [`vocabulary_size`]: TfidfVectorizer::vocabulary_size
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut counts = Array1::<f64>::zeros(self.vocabulary_size());
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                counts[index] += 1.0;
            }
        }
        normalize_vector(&(counts * &self.idf))
    }

    /// Stacks the vectors of `texts` into a `(texts, vocabulary)` matrix.
    pub fn transform_many<S: AsRef<str>>(&self, texts: &[S]) -> Array2<f64> {
        let mut matrix = Array2::zeros((texts.len(), self.vocabulary_size()));
        for (mut row, text) in matrix.rows_mut().into_iter().zip(texts) {
            row.assign(&self.transform(text.as_ref()));
        }
        matrix
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Feature index of `term`, if it is part of the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }
}
