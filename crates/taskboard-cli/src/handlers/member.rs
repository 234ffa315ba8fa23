use taskboard_domain::{MemberRole, TeamMember, MEMBER_COLORS};

use crate::cli::MemberAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: MemberAction) -> anyhow::Result<()> {
    match action {
        MemberAction::List => {
            output::output_list(ctx.session.state().members().to_vec());
        }
        MemberAction::Add {
            name,
            email,
            user_id,
            role,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                anyhow::bail!("Member name must not be empty");
            }
            let org = ctx.session.context().organization_id.clone();
            let mut member = TeamMember::new(org, name, email);
            member.user_id = user_id;
            if let Some(role) = role {
                member.role = parse_role(&role)?;
            }
            let index = ctx.session.state().members().len() % MEMBER_COLORS.len();
            member.color = MEMBER_COLORS[index].to_string();

            let member = ctx.add_member(member).await?;
            output::output_success(&member);
        }
    }
    Ok(())
}

fn parse_role(s: &str) -> anyhow::Result<MemberRole> {
    match s.trim().to_lowercase().as_str() {
        "owner" => Ok(MemberRole::Owner),
        "admin" => Ok(MemberRole::Admin),
        "member" => Ok(MemberRole::Member),
        _ => anyhow::bail!("Invalid role '{}'. Valid values: owner, admin, member", s),
    }
}
