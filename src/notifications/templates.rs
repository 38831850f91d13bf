pub struct NotificationTemplates;

impl NotificationTemplates {
    /// Welcome email for a freshly registered farmer account.
    pub fn farmer_welcome_email(name: &str) -> String {
        format!(
            r#"
<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; background-color: #f4f7fa; padding: 20px;">
    <div style="max-width: 600px; margin: auto; background-color: #ffffff; border-radius: 10px; padding: 25px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);">
      <div style="text-align: center;">
        <img src="cid:life_logo" alt="LifeTag Logo" width="60" />
        <h2 style="color: #2c7be5;">Welcome to LifeTag</h2>
        <p style="color: #444;">Empowering Farmers &bull; Ensuring Livestock Welfare</p>
      </div>
      <hr style="margin: 20px 0;">
      <p>Dear <b>{name}</b>,</p>
      <p>We are delighted to inform you that your <b>LifeTag Farmer Account</b> has been successfully created. You are now part of India's growing digital livestock ecosystem aimed at ensuring traceability, welfare, and transparency.</p>
      <p>With your LifeTag account, you can now:</p>
      <ul>
        <li>Access your registered cattle details and vaccination records.</li>
        <li>Update ownership and track health history.</li>
        <li>Connect with veterinary officers and nearby shelters.</li>
        <li>Receive notifications about upcoming vaccinations and welfare schemes.</li>
      </ul>
      <p style="margin-top: 30px;">Warm regards,<br><b>The LifeTag Support Team</b></p>
      <hr style="margin: 30px 0;">
      <p style="font-size: 12px; color: #888; text-align: center;">
        This is an auto-generated email. Please do not reply.
      </p>
    </div>
  </body>
</html>
"#,
            name = escape(name)
        )
    }

    pub fn vet_welcome_email(name: &str) -> String {
        format!(
            r#"
<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; background-color: #f4f7fa; padding: 20px;">
    <div style="max-width: 600px; margin: auto; background-color: #ffffff; border-radius: 10px; padding: 25px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);">
      <div style="text-align: center;">
        <img src="cid:life_logo" alt="LifeTag Logo" width="60" />
        <h2 style="color: #2c7be5;">Welcome to LifeTag</h2>
        <p style="color: #444;">Veterinarian Account Created</p>
      </div>
      <hr style="margin: 20px 0;">
      <p>Dear Dr. <b>{name}</b>,</p>
      <p>Your veterinarian account has been successfully created. You can now access vet tools, receive alerts, and connect with farmers in your region.</p>
      <p style="margin-top: 30px;">Warm regards,<br><b>The LifeTag Support Team</b></p>
    </div>
  </body>
</html>
"#,
            name = escape(name)
        )
    }

    pub fn shelter_welcome_email(name: &str) -> String {
        format!(
            r#"
<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; background-color: #f4f7fa; padding: 20px;">
    <div style="max-width: 600px; margin: auto; background-color: #ffffff; border-radius: 10px; padding: 25px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);">
      <div style="text-align: center;">
        <img src="cid:life_logo" alt="LifeTag Logo" width="60" />
        <h2 style="color: #2c7be5;">Welcome to LifeTag</h2>
        <p style="color: #444;">Shelter Account Created</p>
      </div>
      <hr style="margin: 20px 0;">
      <p>Dear <b>{name}</b>,</p>
      <p>Your shelter account has been successfully created. You can now manage shelter listings, coordinate rescues, and receive alerts from LifeTag.</p>
      <p style="margin-top: 30px;">Warm regards,<br><b>The LifeTag Support Team</b></p>
    </div>
  </body>
</html>
"#,
            name = escape(name)
        )
    }

    /// Confirmation sent to the reporter after a complaint is filed.
    pub fn complaint_registered_email(reporter_name: &str, complaint_id: &str) -> String {
        format!(
            r#"
<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; background-color: #f4f7fa; padding: 20px;">
    <div style="max-width: 600px; margin: auto; background-color: #ffffff; border-radius: 10px; padding: 25px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);">
      <div style="text-align: center;">
        <img src="cid:life_logo" alt="LifeTag Logo" width="60" />
        <h2 style="color: #2c7be5;">Complaint Registered Successfully</h2>
        <p style="color: #444;">LifeTag &ndash; Livestock Welfare &amp; Monitoring System</p>
      </div>
      <hr style="margin: 20px 0;">
      <p>Dear <b>{name}</b>,</p>
      <p>Thank you for reaching out to <b>LifeTag</b>. Your cattle-related complaint has been successfully registered in our system.</p>
      <p><b>Complaint Details:</b></p>
      <ul>
        <li><b>Complaint ID:</b> {complaint_id}</li>
        <li><b>Status:</b> Open (Under Review)</li>
        <li><b>Category:</b> Livestock Complaint / Abandoned Animal Report</li>
      </ul>
      <p>Our verification team has been notified and will initiate the necessary actions in coordination with nearby shelters and authorities.</p>
      <p style="margin-top: 30px;">Thank you for contributing to animal welfare.<br><b>Team LifeTag</b></p>
      <hr style="margin: 30px 0;">
      <p style="font-size: 12px; color: #888; text-align: center;">
        This is an auto-generated email. Please do not reply.
      </p>
    </div>
  </body>
</html>
"#,
            name = escape(reporter_name),
            complaint_id = escape(complaint_id)
        )
    }
}

/// Minimal HTML escaping for user-provided fields embedded in email bodies.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_fields_are_escaped() {
        let html = NotificationTemplates::complaint_registered_email("<script>", "abc-123");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn templates_reference_the_inline_logo() {
        for html in [
            NotificationTemplates::farmer_welcome_email("A"),
            NotificationTemplates::vet_welcome_email("B"),
            NotificationTemplates::shelter_welcome_email("C"),
            NotificationTemplates::complaint_registered_email("D", "id"),
        ] {
            assert!(html.contains("cid:life_logo"));
        }
    }
}
