use crate::util::errors::{ClassifierError, ClassifierResult};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Classification label returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// "Produtivo": the email requires an action.
    Productive,
    /// "Improdutivo": greetings, spam, vague thanks.
    Unproductive,
    /// "Erro": the backend failed to classify.
    Error,
    /// Any label outside the known set, kept verbatim.
    Other(String),
}

impl Category {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Produtivo" => Category::Productive,
            "Improdutivo" => Category::Unproductive,
            "Erro" => Category::Error,
            other => Category::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Productive => "Produtivo",
            Category::Unproductive => "Improdutivo",
            Category::Error => "Erro",
            Category::Other(label) => label,
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Percentage in 0..=100
    #[serde(rename = "confianca")]
    pub confidence: u8,
    #[serde(rename = "razao")]
    pub rationale: String,
    #[serde(rename = "resposta_sugerida")]
    pub suggested_reply: String,
}

/// Success body exactly as the API sends it; fields are checked in
/// [`RawClassification::into_result`].
#[derive(Debug, Default, Deserialize)]
pub struct RawClassification {
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub confianca: Option<Value>,
    #[serde(default)]
    pub razao: Option<String>,
    #[serde(default)]
    pub resposta_sugerida: Option<String>,
}

impl RawClassification {
    pub fn into_result(self) -> ClassifierResult<ClassificationResult> {
        let category = required(self.categoria, "categoria")?;
        let rationale = required(self.razao, "razao")?;
        let suggested_reply = required(self.resposta_sugerida, "resposta_sugerida")?;

        Ok(ClassificationResult {
            category: Category::from_label(&category),
            confidence: self.confianca.as_ref().map(coerce_confidence).unwrap_or(0),
            rationale,
            suggested_reply,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> ClassifierResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ClassifierError::IncompleteResponse { field }),
    }
}

/// Integer coercion of `confianca`: numbers truncate, strings parse their
/// leading integer, anything else is 0. The result is clamped to 0..=100.
pub fn coerce_confidence(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_leading_int(s).unwrap_or(0),
        _ => 0,
    };
    raw.clamp(0, 100) as u8
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
