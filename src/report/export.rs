use crate::database::models::User;

pub const USER_EXPORT_HEADERS: [&str; 10] = [
    "ID",
    "Email",
    "First Name",
    "Last Name",
    "Phone Number",
    "Role",
    "Status",
    "Profile Complete",
    "Approved",
    "Created At",
];

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub fn users_csv(users: &[User]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(USER_EXPORT_HEADERS)?;

    for user in users {
        writer.write_record([
            user.id.to_string().as_str(),
            user.email.as_str(),
            user.first_name.as_str(),
            user.last_name.as_str(),
            user.phone_number.as_deref().unwrap_or(""),
            user.role.as_str(),
            user.status(),
            yes_no(user.profile_complete),
            yes_no(user.is_approved),
            user.created_at.to_rfc3339().as_str(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}
