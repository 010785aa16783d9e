//! Table schema definitions.
//!
//! This module defines the six tables of the LMS and the exact order of
//! their header columns. Column positions are 0-based indexes into the
//! header and into every data row.

/// A named table with a fixed, ordered header.
#[derive(Debug, PartialEq, Eq)]
pub struct Table {
    /// Table (sheet) name.
    pub name: &'static str,
    /// Column names in storage order.
    pub header: &'static [&'static str],
}

impl Table {
    /// The header as an owned row.
    #[must_use]
    pub fn header_row(&self) -> Vec<String> {
        self.header.iter().map(|c| (*c).to_string()).collect()
    }

    /// Number of columns in the header.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.header.len()
    }
}

/// Registered users.
pub const USERS: Table = Table {
    name: "Users",
    header: &["ID", "Name", "Email", "Password", "Role", "Timestamp"],
};

/// Batches and their owning trainer.
pub const BATCHES: Table = Table {
    name: "Batches",
    header: &[
        "Code",
        "Name",
        "TrainerID",
        "StartDate",
        "EndDate",
        "MaxCapacity",
        "Timestamp",
    ],
};

/// Trainees enrolled in batches.
pub const TRAINEES: Table = Table {
    name: "Trainees",
    header: &["ID", "BatchCode", "Name", "Mobile", "Email", "Timestamp"],
};

/// Attendance marks.
pub const ATTENDANCE: Table = Table {
    name: "Attendance",
    header: &["RecordID", "BatchCode", "TraineeID", "Date", "Status", "Timestamp"],
};

/// Assessment questions.
pub const QUESTIONS: Table = Table {
    name: "Questions",
    header: &["ModuleID", "ModuleName", "QuestionText"],
};

/// Recorded assessment attempts.
pub const RESULTS: Table = Table {
    name: "Results",
    header: &[
        "ResultID",
        "TraineeID",
        "TraineeName",
        "ModuleNumber",
        "VideoLink",
        "AudioLink",
        "AttemptCount",
        "Score",
        "Timestamp",
    ],
};

/// Column positions of the `Users` table.
pub mod users {
    /// `ID`
    pub const ID: usize = 0;
    /// `Name`
    pub const NAME: usize = 1;
    /// `Email`
    pub const EMAIL: usize = 2;
    /// `Password`
    pub const PASSWORD: usize = 3;
    /// `Role`
    pub const ROLE: usize = 4;
    /// `Timestamp`
    pub const TIMESTAMP: usize = 5;
}

/// Column positions of the `Batches` table.
pub mod batches {
    /// `Code`
    pub const CODE: usize = 0;
    /// `Name`
    pub const NAME: usize = 1;
    /// `TrainerID`
    pub const TRAINER_ID: usize = 2;
    /// `StartDate`
    pub const START_DATE: usize = 3;
    /// `EndDate`
    pub const END_DATE: usize = 4;
    /// `MaxCapacity`
    pub const MAX_CAPACITY: usize = 5;
    /// `Timestamp`
    pub const TIMESTAMP: usize = 6;
}

/// Column positions of the `Trainees` table.
pub mod trainees {
    /// `ID`
    pub const ID: usize = 0;
    /// `BatchCode`
    pub const BATCH_CODE: usize = 1;
    /// `Name`
    pub const NAME: usize = 2;
    /// `Mobile`
    pub const MOBILE: usize = 3;
    /// `Email`
    pub const EMAIL: usize = 4;
    /// `Timestamp`
    pub const TIMESTAMP: usize = 5;
}

/// Column positions of the `Attendance` table.
pub mod attendance {
    /// `RecordID`
    pub const RECORD_ID: usize = 0;
    /// `BatchCode`
    pub const BATCH_CODE: usize = 1;
    /// `TraineeID`
    pub const TRAINEE_ID: usize = 2;
    /// `Date`
    pub const DATE: usize = 3;
    /// `Status`
    pub const STATUS: usize = 4;
    /// `Timestamp`
    pub const TIMESTAMP: usize = 5;
}

/// Column positions of the `Questions` table.
pub mod questions {
    /// `ModuleID`
    pub const MODULE_ID: usize = 0;
    /// `ModuleName`
    pub const MODULE_NAME: usize = 1;
    /// `QuestionText`
    pub const QUESTION_TEXT: usize = 2;
}

/// Column positions of the `Results` table.
pub mod results {
    /// `ResultID`
    pub const RESULT_ID: usize = 0;
    /// `TraineeID`
    pub const TRAINEE_ID: usize = 1;
    /// `TraineeName`
    pub const TRAINEE_NAME: usize = 2;
    /// `ModuleNumber`
    pub const MODULE_NUMBER: usize = 3;
    /// `VideoLink`
    pub const VIDEO_LINK: usize = 4;
    /// `AudioLink`
    pub const AUDIO_LINK: usize = 5;
    /// `AttemptCount`
    pub const ATTEMPT_COUNT: usize = 6;
    /// `Score`
    pub const SCORE: usize = 7;
    /// `Timestamp`
    pub const TIMESTAMP: usize = 8;
}

/// Returns every table for backend initialization.
#[must_use]
pub fn all_tables() -> Vec<&'static Table> {
    vec![&USERS, &BATCHES, &TRAINEES, &ATTENDANCE, &QUESTIONS, &RESULTS]
}

/// Look up a table by name.
#[must_use]
pub fn table_named(name: &str) -> Option<&'static Table> {
    all_tables().into_iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_constants_match_headers() {
        assert_eq!(USERS.header[users::PASSWORD], "Password");
        assert_eq!(BATCHES.header[batches::TRAINER_ID], "TrainerID");
        assert_eq!(TRAINEES.header[trainees::BATCH_CODE], "BatchCode");
        assert_eq!(ATTENDANCE.header[attendance::STATUS], "Status");
        assert_eq!(QUESTIONS.header[questions::QUESTION_TEXT], "QuestionText");
        assert_eq!(RESULTS.header[results::SCORE], "Score");
        assert_eq!(RESULTS.width(), results::TIMESTAMP + 1);
    }

    #[test]
    fn tables_are_found_by_name() {
        assert_eq!(table_named("Results"), Some(&RESULTS));
        assert_eq!(table_named("Missing"), None);
        assert_eq!(all_tables().len(), 6);
    }
}
