//! GraphQL documents sent to the backend
//!
//! Each operation is identified by name; the name is also the response field
//! the result is read from.

/// A named GraphQL document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Operation name, sent as `operationName`
    pub name: &'static str,
    /// Top-level field the result lives under in `data`
    pub field: &'static str,
    /// GraphQL source
    pub document: &'static str,
}

/// Token exchange for a stored password credential
pub const LOG_IN_WITH_TOKEN: Operation = Operation {
    name: "logInWithToken",
    field: "logInWithToken",
    document: r#"mutation logInWithToken($accessToken: String!, $userId: String!, $deviceId: String!) {
    logInWithToken(accessToken: $accessToken, userId: $userId, deviceId: $deviceId) {
        _id, username, activated, email, facebookId, currentAccessToken
    }
}"#,
};

/// Token exchange for a social-provider token
pub const LOG_IN_WITH_FACEBOOK_ACCESS_TOKEN: Operation = Operation {
    name: "logInWithFacebookAccessToken",
    field: "logInWithFacebookAccessToken",
    document: r#"mutation logInWithFacebookAccessToken($accessTokenFb: String!) {
    logInWithFacebookAccessToken(accessTokenFb: $accessTokenFb) {
        _id, username, activated, email, facebookId, currentAccessToken
    }
}"#,
};

/// Username/password login
pub const LOG_IN: Operation = Operation {
    name: "logIn",
    field: "logIn",
    document: r#"mutation logIn($username: String!, $password: String!, $deviceId: String!, $saveToken: Boolean) {
    logIn(username: $username, password: $password, deviceId: $deviceId, saveToken: $saveToken) {
        _id, username, activated, facebookId, currentAccessToken
    }
}"#,
};

/// Signup: attaches credentials to the current guest
pub const SET_USERNAME_AND_PASSWORD_FOR_GUEST: Operation = Operation {
    name: "setUsernameAndPasswordForGuest",
    field: "setUsernameAndPasswordForGuest",
    document: r#"mutation setUsernameAndPasswordForGuest($username: String!, $password: String!, $deviceId: String!, $saveToken: Boolean) {
    setUsernameAndPasswordForGuest(username: $username, password: $password, deviceId: $deviceId, saveToken: $saveToken) {
        _id, username, activated, facebookId, currentAccessToken
    }
}"#,
};

/// Server-side token invalidation
pub const CLEAR_TOKEN: Operation = Operation {
    name: "clearToken",
    field: "clearToken",
    document: r#"mutation clearToken($userId: String!, $token: String!) {
    clearToken(userId: $userId, token: $token)
}"#,
};

/// Course selection
pub const SELECT_COURSE_SAVE_TOKEN: Operation = Operation {
    name: "selectCourseSaveToken",
    field: "selectCourseSaveToken",
    document: r#"mutation selectCourseSaveToken($courseId: String!, $deviceId: String) {
    selectCourseSaveToken(courseId: $courseId, deviceId: $deviceId) {
        selectedCourse
        hasDisabledTutorial
        isCasual
        experience {
            level
            showLevelUp
        }
    }
}"#,
};

/// Course close
pub const CLOSE_COURSE: Operation = Operation {
    name: "closeCourse",
    field: "closeCourse",
    document: r#"mutation closeCourse {
    closeCourse {
        selectedCourse
        hasDisabledTutorial
        isCasual
        experience {
            level
            showLevelUp
        }
    }
}"#,
};

/// Current user query
pub const CURRENT_USER: Operation = Operation {
    name: "CurrentUser",
    field: "CurrentUser",
    document: r#"query CurrentUser {
    CurrentUser {
        _id, username, activated, email, facebookId, currentAccessToken
    }
}"#,
};

/// User details query
pub const USER_DETAILS: Operation = Operation {
    name: "UserDetails",
    field: "UserDetails",
    document: r#"query UserDetails {
    UserDetails {
        selectedCourse
        hasDisabledTutorial
        isCasual
        experience {
            level
            showLevelUp
        }
    }
}"#,
};

/// Course list query
pub const COURSES: Operation = Operation {
    name: "Courses",
    field: "Courses",
    document: r#"query Courses {
    Courses {
        _id, name, color, isDisabled
    }
}"#,
};
