//! Candidate application form: validation, preview summary and the file
//! chooser label. Submission is simulated.

use crate::dom::markup::escape;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

pub const OTHER_BAC: &str = "Autre";
pub const CONFIRMATION_MESSAGE: &str = "Votre candidature a été préparée. (Simulation)";
const EMPTY_VALUE: &str = "—";
const MIN_PHONE_DIGITS: usize = 8;
const FIRST_BAC_YEAR: i32 = 1980;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Le champ {0} est obligatoire")]
    Required(&'static str),
    #[error("Adresse e-mail invalide")]
    InvalidEmail,
    #[error("Numéro de téléphone invalide")]
    InvalidPhone,
    #[error("Date de naissance invalide")]
    InvalidBirthDate,
    #[error("Précisez la série du baccalauréat")]
    MissingOtherBac,
    #[error("La moyenne doit être comprise entre 0 et 20")]
    AverageOutOfRange,
    #[error("L'année du bac doit être comprise entre {min} et {max}")]
    BacYearOutOfRange { min: i32, max: i32 },
}

impl FieldError {
    /// Form field the error is attached to.
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Required(field) => *field,
            FieldError::InvalidEmail => "email",
            FieldError::InvalidPhone => "telephone",
            FieldError::InvalidBirthDate => "date_naissance",
            FieldError::MissingOtherBac => "bac_autre",
            FieldError::AverageOutOfRange => "moyenne",
            FieldError::BacYearOutOfRange { .. } => "annee_bac",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidature {
    pub prenom: String,
    pub nom: String,
    pub email: String,
    pub telephone: String,
    pub date_naissance: String,
    pub bac: String,
    pub bac_autre: String,
    pub annee_bac: String,
    pub moyenne: String,
    pub filiere: String,
    /// Names of the attached files.
    #[serde(default)]
    pub files: Vec<String>,
}

impl Candidature {
    /// Build from submitted `(name, value)` pairs. Unknown names are ignored.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut candidature = Self::default();
        for (name, value) in fields {
            let value = value.trim().to_string();
            match name {
                "prenom" => candidature.prenom = value,
                "nom" => candidature.nom = value,
                "email" => candidature.email = value,
                "telephone" => candidature.telephone = value,
                "date_naissance" => candidature.date_naissance = value,
                "bac" => candidature.select_bac(value),
                "bac_autre" => candidature.bac_autre = value,
                "annee_bac" => candidature.annee_bac = value,
                "moyenne" => candidature.moyenne = value,
                "filiere" => candidature.filiere = value,
                _ => {}
            }
        }
        if candidature.bac != OTHER_BAC {
            candidature.bac_autre.clear();
        }
        candidature
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Leaving "Autre" discards the free-text series.
    pub fn select_bac(&mut self, bac: impl Into<String>) {
        self.bac = bac.into();
        if self.bac != OTHER_BAC {
            self.bac_autre.clear();
        }
    }

    pub fn requires_other_bac(&self) -> bool {
        self.bac == OTHER_BAC
    }

    /// Every problem found, in form order.
    pub fn validate(&self, current_year: i32) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let required = [
            ("prenom", self.prenom.as_str()),
            ("nom", self.nom.as_str()),
            ("email", self.email.as_str()),
            ("telephone", self.telephone.as_str()),
            ("date_naissance", self.date_naissance.as_str()),
            ("bac", self.bac.as_str()),
            ("annee_bac", self.annee_bac.as_str()),
            ("moyenne", self.moyenne.as_str()),
            ("filiere", self.filiere.as_str()),
        ];
        for (field, value) in required {
            if value.is_empty() {
                errors.push(FieldError::Required(field));
            }
        }

        if !self.email.is_empty() && !EMAIL.is_match(&self.email) {
            errors.push(FieldError::InvalidEmail);
        }
        if !self.telephone.is_empty()
            && self.telephone.chars().filter(char::is_ascii_digit).count() < MIN_PHONE_DIGITS
        {
            errors.push(FieldError::InvalidPhone);
        }
        if !self.date_naissance.is_empty()
            && NaiveDate::parse_from_str(&self.date_naissance, "%Y-%m-%d").is_err()
        {
            errors.push(FieldError::InvalidBirthDate);
        }
        if self.requires_other_bac() && self.bac_autre.is_empty() {
            errors.push(FieldError::MissingOtherBac);
        }
        if !self.moyenne.is_empty() {
            let in_range = parse_decimal(&self.moyenne).is_some_and(|m| (0.0..=20.0).contains(&m));
            if !in_range {
                errors.push(FieldError::AverageOutOfRange);
            }
        }
        if !self.annee_bac.is_empty() {
            let max = current_year + 1;
            let in_range = self
                .annee_bac
                .parse::<i32>()
                .is_ok_and(|y| (FIRST_BAC_YEAR..=max).contains(&y));
            if !in_range {
                errors.push(FieldError::BacYearOutOfRange {
                    min: FIRST_BAC_YEAR,
                    max,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Preview markup: a definition list with `—` for empty values,
    /// followed by the attached files when there are any.
    pub fn summary(&self) -> String {
        let bac = if self.requires_other_bac() && !self.bac_autre.is_empty() {
            format!("{} ({})", self.bac, self.bac_autre)
        } else {
            self.bac.clone()
        };
        let rows = [
            ("Prénom", self.prenom.as_str()),
            ("Nom", self.nom.as_str()),
            ("Email", self.email.as_str()),
            ("Téléphone", self.telephone.as_str()),
            ("Date de naissance", self.date_naissance.as_str()),
            ("Série Bac", bac.as_str()),
            ("Année Bac", self.annee_bac.as_str()),
            ("Moyenne", self.moyenne.as_str()),
            ("Filière souhaitée", self.filiere.as_str()),
        ];
        let entries: String = rows
            .iter()
            .map(|(term, value)| {
                let value = if value.is_empty() { EMPTY_VALUE.to_string() } else { escape(value) };
                format!("<dt>{term}</dt><dd>{value}</dd>")
            })
            .collect();

        let mut html = format!("<dl>{entries}</dl>");
        if !self.files.is_empty() {
            let items: String = self
                .files
                .iter()
                .map(|f| format!("<li>{}</li>", escape(f)))
                .collect();
            html.push_str(&format!("<h4>Fichiers joints</h4><ul>{items}</ul>"));
        }
        html
    }

    /// Summary preceded by the simulated-submission notice.
    pub fn confirmation(&self) -> String {
        format!(r#"<p class="success">{CONFIRMATION_MESSAGE}</p>{}"#, self.summary())
    }
}

pub fn file_chooser_label(files: &[String]) -> String {
    match files.len() {
        0 => "Aucun fichier sélectionné".to_string(),
        n => format!("{n} fichier(s) sélectionné(s)"),
    }
}

/// Accepts a decimal comma.
fn parse_decimal(value: &str) -> Option<f64> {
    value.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}
