use serde_json::{json, Map, Value};

use travelblog_core::prelude::*;

use super::first_duplicate;
use crate::error::{BlogError, BlogResult};

const DEFAULT_PROFILE_PICTURE: &str = "./img/user1.png";

/// A user record, as far as its unique keys and sub-collections go.
///
/// Optional sequences stay `None` when the stored record lacks them, so a mutation only ever
/// adds the sub-collection it touches.
#[derive(Debug, Clone, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
#[document(collection = "users", unique = "username", unique = "email", validate = User::check)]
pub struct User {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_destinations: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_post_ids: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_itineraries: Option<Vec<Record>>,
}

impl User {
    fn check(&self) -> DocumentStoreResult<()> {
        let favorites = self.favorites().iter().filter_map(RecordId::from_value);

        if let Some(id) = first_duplicate(favorites) {
            return Err(DocumentStoreError::InvalidDocument(format!(
                "favoritePostIds contains {id} more than once"
            )));
        }

        let itineraries = self.travel_itineraries.iter().flatten().filter_map(Record::id);

        if let Some(id) = first_duplicate(itineraries) {
            return Err(DocumentStoreError::InvalidDocument(format!(
                "travelItineraries contains id {id} more than once"
            )));
        }

        Ok(())
    }

    pub fn favorites(&self) -> &[Value] {
        self.favorite_post_ids.as_deref().unwrap_or_default()
    }

    pub fn saved_destinations(&self) -> &[Value] {
        self.saved_destinations.as_deref().unwrap_or_default()
    }

    pub fn is_favorite(&self, post_id: &RecordId) -> bool {
        self.favorites().iter().any(|v| post_id.matches(v))
    }

    /// Adds a post to the favorites set.
    pub fn add_favorite(&mut self, post_id: &RecordId) -> BlogResult<()> {
        if self.is_favorite(post_id) {
            return Err(BlogError::Conflict("Post already in favorites".into()));
        }

        self.favorite_post_ids
            .get_or_insert_with(Vec::new)
            .push(post_id.clone().into());

        Ok(())
    }

    /// Removes the first occurrence of a post from the favorites set.
    pub fn remove_favorite(&mut self, post_id: &RecordId) -> BlogResult<()> {
        let index = self
            .favorites()
            .iter()
            .position(|v| post_id.matches(v))
            .ok_or_else(|| BlogError::not_found("Post not found in favorites"))?;

        if let Some(favorites) = self.favorite_post_ids.as_mut() {
            favorites.remove(index);
        }

        Ok(())
    }

    /// Appends a destination; duplicates are allowed.
    pub fn add_saved_destination(&mut self, destination: Value) {
        self.saved_destinations
            .get_or_insert_with(Vec::new)
            .push(destination);
    }

    pub fn has_itinerary(&self, id: &RecordId) -> bool {
        self.travel_itineraries
            .iter()
            .flatten()
            .any(|itinerary| itinerary.has_id(id))
    }

    /// Appends an itinerary built from `fields` under `id` and returns it.
    pub fn add_itinerary(&mut self, id: &RecordId, fields: Map<String, Value>) -> Record {
        let itinerary = Record::with_id(id, fields);

        self.travel_itineraries
            .get_or_insert_with(Vec::new)
            .push(itinerary.clone());

        itinerary
    }
}

/// Body of `POST /api/users/register`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Registration {
    pub fn validate(&self) -> BlogResult<()> {
        let required = [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
        ];

        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(BlogError::Validation(format!("{field} is required")));
        }

        if !self.email.contains('@') {
            return Err(BlogError::Validation("email is invalid".into()));
        }

        Ok(())
    }

    /// Builds the full default user shape for this registration.
    pub fn into_fields(self, created_at: String) -> Map<String, Value> {
        let mut fields = Map::new();

        fields.insert("username".into(), self.username.into());
        fields.insert(
            "UserName".into(),
            json!({ "first": self.first_name, "last": self.last_name }),
        );
        fields.insert("email".into(), self.email.into());
        fields.insert("password".into(), self.password.into());
        fields.insert("createdAt".into(), created_at.into());
        fields.insert("profilePicture".into(), DEFAULT_PROFILE_PICTURE.into());
        fields.insert("bio".into(), "".into());
        fields.insert(
            "socialMedia".into(),
            json!({ "facebook": "", "instagram": "", "twitter": "" }),
        );
        fields.insert("savedDestinations".into(), json!([]));
        fields.insert("postIds".into(), json!([]));
        fields.insert("favoritePostIds".into(), json!([]));
        fields.insert("travelItineraries".into(), json!([]));

        fields
    }
}

/// Single-field views served under `/api/users/:id/<segment>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Username,
    Email,
    Bio,
    SocialMedia,
    SavedDestinations,
    PostIds,
    FavoritePostIds,
}

impl Projection {
    pub const ALL: [Projection; 7] = [
        Self::Username,
        Self::Email,
        Self::Bio,
        Self::SocialMedia,
        Self::SavedDestinations,
        Self::PostIds,
        Self::FavoritePostIds,
    ];

    /// Resolves a lowercase path segment such as `saveddestinations`.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.segment() == segment)
    }

    /// Path segment serving this view.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Bio => "bio",
            Self::SocialMedia => "socialmedia",
            Self::SavedDestinations => "saveddestinations",
            Self::PostIds => "postids",
            Self::FavoritePostIds => "favoritepostids",
        }
    }

    /// Name of the record field this view exposes.
    pub fn field(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Bio => "bio",
            Self::SocialMedia => "socialMedia",
            Self::SavedDestinations => "savedDestinations",
            Self::PostIds => "postIds",
            Self::FavoritePostIds => "favoritePostIds",
        }
    }

    /// Returns `{ <field>: value }`, or `{}` if the record lacks the field.
    pub fn apply(self, record: &Record) -> Value {
        let mut view = Map::new();

        if let Some(value) = record.get(self.field()) {
            view.insert(self.field().to_string(), value.clone());
        }

        Value::Object(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(value: Value) -> User {
        User::from_record(Record::try_from(value).unwrap()).unwrap()
    }

    #[test]
    fn favorites_behave_as_a_set() {
        let mut ana = user(json!({ "id": 1, "favoritePostIds": [] }));
        let seven = RecordId::from("7");

        ana.add_favorite(&seven).unwrap();
        assert_eq!(ana.favorites(), [json!("7")]);

        assert!(matches!(ana.add_favorite(&seven), Err(BlogError::Conflict(_))));
        assert_eq!(ana.favorites().len(), 1);

        ana.remove_favorite(&seven).unwrap();
        assert!(ana.favorites().is_empty());
        assert!(matches!(ana.remove_favorite(&seven), Err(BlogError::NotFound(_))));
    }

    #[test]
    fn numeric_favorites_match_canonical_ids() {
        let mut ana = user(json!({ "id": 1, "favoritePostIds": [7, "8"] }));

        assert!(ana.is_favorite(&RecordId::from("7")));
        ana.remove_favorite(&RecordId::from("7")).unwrap();
        assert_eq!(ana.favorites(), [json!("8")]);
    }

    #[test]
    fn untouched_sub_collections_stay_absent() {
        let mut ana = user(json!({ "id": 1, "username": "ana" }));
        ana.add_saved_destination(json!("Kyoto"));
        ana.add_saved_destination(json!("Kyoto"));

        let record = ana.to_record().unwrap();
        assert_eq!(record.get("savedDestinations"), Some(&json!(["Kyoto", "Kyoto"])));
        assert_eq!(record.get("favoritePostIds"), None);
        assert_eq!(record.get("travelItineraries"), None);
    }

    #[test]
    fn itineraries_get_the_given_id_first() {
        let mut ana = user(json!({ "id": 1 }));
        let fields = json!({ "id": "mine", "title": "Japan" }).as_object().cloned().unwrap();

        let itinerary = ana.add_itinerary(&RecordId::from("1700000000000"), fields);

        assert_eq!(
            serde_json::to_string(&itinerary).unwrap(),
            r#"{"id":"1700000000000","title":"Japan"}"#
        );
        assert!(ana.has_itinerary(&RecordId::from("1700000000000")));
    }

    #[test]
    fn duplicate_sub_record_ids_fail_validation() {
        let ana = user(json!({ "id": 1, "favoritePostIds": ["7", 7] }));
        assert!(ana.validate().is_err());

        let ben = user(json!({ "id": 2, "travelItineraries": [{ "id": 3 }, { "id": "3" }] }));
        assert!(ben.validate().is_err());
    }

    #[test]
    fn registration_requires_every_field() {
        let registration = Registration {
            username: "ana".into(),
            email: "ana@x.io".into(),
            password: "secret".into(),
            first_name: "Ana".into(),
            last_name: String::new(),
        };

        let err = registration.validate().unwrap_err();
        assert_eq!(err.to_string(), "lastName is required");

        let err = Registration {
            last_name: "Souza".into(),
            email: "ana.x.io".into(),
            ..registration
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "email is invalid");
    }

    #[test]
    fn registration_builds_the_default_shape() {
        let fields = Registration {
            username: "ana".into(),
            email: "ana@x.io".into(),
            password: "secret".into(),
            first_name: "Ana".into(),
            last_name: "Souza".into(),
        }
        .into_fields("2024-05-01T10:00:00.000Z".into());

        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "username",
                "UserName",
                "email",
                "password",
                "createdAt",
                "profilePicture",
                "bio",
                "socialMedia",
                "savedDestinations",
                "postIds",
                "favoritePostIds",
                "travelItineraries",
            ]
        );
        assert_eq!(fields["UserName"], json!({ "first": "Ana", "last": "Souza" }));
        assert_eq!(fields["profilePicture"], json!("./img/user1.png"));
    }

    #[test]
    fn projections_use_lowercase_segments() {
        let record = Record::try_from(json!({ "id": 1, "socialMedia": { "twitter": "@ana" } }))
            .unwrap();

        let view = Projection::from_segment("socialmedia").unwrap().apply(&record);
        assert_eq!(view, json!({ "socialMedia": { "twitter": "@ana" } }));

        assert_eq!(Projection::from_segment("bio").unwrap().apply(&record), json!({}));
        assert_eq!(Projection::from_segment("socialMedia"), None);
    }
}
